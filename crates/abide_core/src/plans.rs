//! Reading-plan progress.

use crate::bridge::{Binding, BindingOptions};
use crate::error::Result;
use crate::keys::BIBLE_PLANS_PROGRESS;
use crate::model::PlanProgress;
use crate::store::Store;

/// Live view of the plan progress key.
pub struct Plans {
    progress: Binding<PlanProgress>,
}

impl Plans {
    /// Open the plan progress.
    pub fn open(store: &Store, options: BindingOptions) -> Self {
        Self {
            progress: Binding::open_with(
                store,
                BIBLE_PLANS_PROGRESS,
                PlanProgress::default(),
                options,
            ),
        }
    }

    /// The current progress.
    pub fn progress(&self) -> PlanProgress {
        self.progress.get()
    }

    /// Flip one day of a plan. Returns whether it is now done.
    pub fn toggle_day(&self, plan_id: &str, day: u32) -> Result<bool> {
        let mut progress = self.progress.get();
        let done = progress.toggle_day(plan_id, day);
        self.progress.try_set(progress)?;
        Ok(done)
    }

    /// Mark one day of a plan done.
    pub fn complete_day(&self, plan_id: &str, day: u32) -> Result<()> {
        let mut progress = self.progress.get();
        progress.complete_day(plan_id, day);
        self.progress.try_set(progress)
    }

    /// Days done in a plan.
    pub fn completed_days(&self, plan_id: &str) -> usize {
        self.progress.with(|p| p.completed_days(plan_id))
    }
}
