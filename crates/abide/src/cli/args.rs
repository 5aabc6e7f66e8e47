//! Command-line argument structures and enums

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "abide")]
#[command(version)]
#[command(
    about = "A local-first devotional journal, prayer list and Bible reading tracker",
    long_about = None
)]
pub struct Cli {
    /// Override the data directory
    #[arg(short, long, global = true)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write the config file (data directory from --data-dir or the default)
    Init {
        /// Default directory for exported backups
        #[arg(short, long)]
        backup_dir: Option<PathBuf>,

        /// Do not follow writes made by other processes
        #[arg(long)]
        no_sync: bool,
    },

    /// Show current configuration
    Config,

    /// Devotional journal entries
    #[command(alias = "j")]
    Journal {
        #[command(subcommand)]
        command: JournalCommands,
    },

    /// Prayer requests
    #[command(alias = "p")]
    Prayer {
        #[command(subcommand)]
        command: PrayerCommands,
    },

    /// Sermon and message notes
    #[command(alias = "n")]
    Notes {
        #[command(subcommand)]
        command: NoteCommands,
    },

    /// Small-group shares
    Shares {
        #[command(subcommand)]
        command: ShareCommands,
    },

    /// Devotional cards
    Cards {
        #[command(subcommand)]
        command: CardCommands,
    },

    /// Bible reading tracker
    Tracker {
        #[command(subcommand)]
        command: TrackerCommands,
    },

    /// Reading-plan progress
    Plan {
        #[command(subcommand)]
        command: PlanCommands,
    },

    /// Export everything to Abide-backup-<date>.json
    Export {
        /// Destination directory (default: config backup_dir or the current directory)
        destination: Option<PathBuf>,
    },

    /// Import a backup file, merging records by id
    Import {
        /// Backup file to import
        path: PathBuf,
    },

    /// Print changes written by other processes as they arrive
    Watch {
        /// Polling interval in milliseconds
        #[arg(short, long, default_value_t = 1000)]
        interval: u64,
    },
}

/// Options shared by list commands
#[derive(Args, Clone, Default)]
pub struct ListArgs {
    /// Case-insensitive search text
    #[arg(short, long)]
    pub search: Option<String>,

    /// Oldest first (default: newest first)
    #[arg(long)]
    pub asc: bool,
}

/// Options shared by delete commands
#[derive(Args, Clone)]
pub struct DeleteArgs {
    /// Ids (or unique id prefixes) to delete
    #[arg(required = true)]
    pub ids: Vec<String>,

    /// Skip the confirmation prompt
    #[arg(short = 'y', long)]
    pub yes: bool,
}

#[derive(Subcommand)]
pub enum CommentCommands {
    /// Add a comment
    Add {
        /// Record id
        id: String,
        /// Comment text
        text: String,
    },
    /// Replace a comment's text
    Edit {
        /// Record id
        id: String,
        /// Comment id
        comment_id: String,
        /// New text
        text: String,
    },
    /// Delete a comment
    Delete {
        /// Record id
        id: String,
        /// Comment id
        comment_id: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum JournalStatusArg {
    All,
    Commented,
    Liked,
    Pending,
}

#[derive(Subcommand)]
pub enum JournalCommands {
    /// List entries
    #[command(alias = "ls")]
    List {
        #[command(flatten)]
        list: ListArgs,

        /// Status filter
        #[arg(long, value_enum)]
        status: Option<JournalStatusArg>,

        /// Only entries for this book
        #[arg(short, long)]
        book: Option<String>,
    },

    /// Show one entry with its comments
    Show {
        /// Entry id
        id: String,
    },

    /// Add an entry
    Add {
        /// Bible book
        #[arg(short, long)]
        book: String,

        /// Chapter number
        #[arg(short, long)]
        chapter: u32,

        /// Verse or verse range
        #[arg(short, long)]
        verse: Option<String>,

        /// Entry date (YYYY-MM-DD or e.g. "yesterday")
        #[arg(long, default_value = "today")]
        date: String,

        /// Passages that stood out
        #[arg(long)]
        highlights: Option<String>,

        /// What God said through the reading
        #[arg(short, long)]
        message: Option<String>,

        /// Mark the chapter completed
        #[arg(long)]
        completed: bool,
    },

    /// Edit an entry
    Edit {
        /// Entry id
        id: String,

        #[arg(short, long)]
        book: Option<String>,

        #[arg(short, long)]
        chapter: Option<u32>,

        #[arg(short, long)]
        verse: Option<String>,

        #[arg(long)]
        date: Option<String>,

        #[arg(long)]
        highlights: Option<String>,

        #[arg(short, long)]
        message: Option<String>,

        /// Completed flag (true/false)
        #[arg(long)]
        completed: Option<bool>,
    },

    /// Delete entries
    #[command(alias = "rm")]
    Delete(DeleteArgs),

    /// Toggle like
    Like {
        /// Entry id
        id: String,
    },

    /// Manage comments
    Comment {
        #[command(subcommand)]
        command: CommentCommands,
    },

    /// List the books that have entries
    Books,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum PrayerStatusArg {
    All,
    Unanswered,
    Answered,
    Commented,
    Liked,
}

#[derive(Subcommand)]
pub enum PrayerCommands {
    /// List prayer requests
    #[command(alias = "ls")]
    List {
        #[command(flatten)]
        list: ListArgs,

        /// Status filter
        #[arg(long, value_enum)]
        status: Option<PrayerStatusArg>,
    },

    /// Show one request with its comments
    Show {
        /// Prayer id
        id: String,
    },

    /// Add a prayer request
    Add {
        /// Short title
        #[arg(short, long)]
        title: String,

        /// Who the prayer is for
        #[arg(short, long, default_value = "")]
        person: String,

        /// The request
        #[arg(short, long, default_value = "")]
        content: String,

        /// Date of the request
        #[arg(long, default_value = "today")]
        date: String,
    },

    /// Edit a prayer request
    Edit {
        /// Prayer id
        id: String,

        #[arg(short, long)]
        title: Option<String>,

        #[arg(short, long)]
        person: Option<String>,

        #[arg(short, long)]
        content: Option<String>,

        #[arg(long)]
        date: Option<String>,

        /// How God answered
        #[arg(short, long)]
        response: Option<String>,
    },

    /// Mark a prayer answered
    Answer {
        /// Prayer id
        id: String,

        /// How God answered
        #[arg(short, long)]
        response: Option<String>,
    },

    /// Mark a prayer unanswered again
    Unanswer {
        /// Prayer id
        id: String,
    },

    /// Delete prayer requests
    #[command(alias = "rm")]
    Delete(DeleteArgs),

    /// Toggle like
    Like {
        /// Prayer id
        id: String,
    },

    /// Manage comments
    Comment {
        #[command(subcommand)]
        command: CommentCommands,
    },
}

#[derive(Subcommand)]
pub enum NoteCommands {
    /// List notes
    #[command(alias = "ls")]
    List {
        #[command(flatten)]
        list: ListArgs,

        /// Only notes with this tag
        #[arg(short, long)]
        tag: Option<String>,
    },

    /// Show one note
    Show {
        /// Note id
        id: String,
    },

    /// Add a note
    Add {
        /// Message title
        #[arg(short, long)]
        title: String,

        /// Speaker
        #[arg(short, long, default_value = "")]
        speaker: String,

        /// Notes
        #[arg(short, long, default_value = "")]
        content: String,

        /// Comma-separated tags
        #[arg(long, default_value = "")]
        tags: String,

        /// Date of the message
        #[arg(long, default_value = "today")]
        date: String,
    },

    /// Edit a note
    Edit {
        /// Note id
        id: String,

        #[arg(short, long)]
        title: Option<String>,

        #[arg(short, long)]
        speaker: Option<String>,

        #[arg(short, long)]
        content: Option<String>,

        /// Comma-separated tags (replaces existing tags)
        #[arg(long)]
        tags: Option<String>,

        #[arg(long)]
        date: Option<String>,
    },

    /// Delete notes
    #[command(alias = "rm")]
    Delete(DeleteArgs),

    /// List every tag in use
    Tags,
}

#[derive(Subcommand)]
pub enum ShareCommands {
    /// List shares
    #[command(alias = "ls")]
    List {
        #[command(flatten)]
        list: ListArgs,
    },

    /// Add a share
    Add {
        /// Group name
        #[arg(short, long)]
        group: String,

        /// Bible book
        #[arg(short, long)]
        book: String,

        /// Chapter
        #[arg(short, long)]
        chapter: u32,

        /// Verse or verse range
        #[arg(short, long, default_value = "")]
        verse: String,

        /// Topic
        #[arg(short, long, default_value = "")]
        topic: String,

        /// What you shared
        #[arg(short, long, default_value = "")]
        share: String,

        /// Meeting date
        #[arg(long, default_value = "today")]
        date: String,
    },

    /// Edit a share
    Edit {
        /// Share id
        id: String,

        #[arg(short, long)]
        group: Option<String>,

        #[arg(short, long)]
        book: Option<String>,

        #[arg(short, long)]
        chapter: Option<u32>,

        #[arg(short, long)]
        verse: Option<String>,

        #[arg(short, long)]
        topic: Option<String>,

        #[arg(short, long)]
        share: Option<String>,

        #[arg(long)]
        date: Option<String>,
    },

    /// Delete shares
    #[command(alias = "rm")]
    Delete(DeleteArgs),
}

#[derive(Subcommand)]
pub enum CardCommands {
    /// List collected cards
    #[command(alias = "ls")]
    List {
        /// Case-insensitive search text
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Spend grace points to draw a card
    Draw {
        /// Keep the card without asking
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Delete collected cards
    #[command(alias = "rm")]
    Delete(DeleteArgs),

    /// Show grace points
    Points,
}

#[derive(Subcommand)]
pub enum TrackerCommands {
    /// Show reading progress
    Show {
        /// Only this book
        book: Option<String>,
    },

    /// Mark a chapter read or unread
    Toggle {
        /// Bible book
        book: String,
        /// Chapter number
        chapter: u32,
    },
}

#[derive(Subcommand)]
pub enum PlanCommands {
    /// Show plan progress
    Show {
        /// Only this plan
        plan: Option<String>,
    },

    /// Mark a day done or not done
    Toggle {
        /// Plan id
        plan: String,
        /// Day number
        day: u32,
    },

    /// Mark a day done
    Complete {
        /// Plan id
        plan: String,
        /// Day number
        day: u32,
    },
}
