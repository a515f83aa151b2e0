//! Task identities and their fixed priorities.
//!
//! Priorities are explicit small integers where a lower value is more
//! urgent. The firmware binaries turn a plan into interrupt executor levels
//! through [`urgency_rank`], so the order tasks are declared or spawned in
//! never decides who preempts whom.

use core::fmt;

use embedded_hal_async::delay::DelayNs;

/// Fixed task priority. Lower value means higher urgency.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TaskPriority(pub u8);

impl TaskPriority {
    /// Whether a task at `self` preempts a task at `other`.
    pub const fn preempts(self, other: TaskPriority) -> bool {
        self.0 < other.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TaskSpec {
    pub name: &'static str,
    pub priority: TaskPriority,
}

impl TaskSpec {
    pub const fn new(name: &'static str, priority: u8) -> Self {
        Self {
            name,
            priority: TaskPriority(priority),
        }
    }
}

pub const LED1: TaskSpec = TaskSpec::new("led1", 4);
pub const LED2: TaskSpec = TaskSpec::new("led2", 5);
pub const COUNT1: TaskSpec = TaskSpec::new("count1", 6);
pub const COUNT2: TaskSpec = TaskSpec::new("count2", 7);
pub const BUTTONS: TaskSpec = TaskSpec::new("buttons", 6);

/// LED1 holds the most urgent slot in both plans.
pub const COUNTER_DISPLAY_PLAN: [TaskSpec; 4] = [LED1, LED2, COUNT1, COUNT2];
pub const BUTTON_FLASHER_PLAN: [TaskSpec; 3] = [LED1, LED2, BUTTONS];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ScheduleError {
    /// Two tasks share a priority, so neither can preempt the other.
    DuplicatePriority {
        first: &'static str,
        second: &'static str,
        priority: TaskPriority,
    },
    /// The task is not part of the plan.
    UnknownTask(&'static str),
    /// More tasks than preemption levels the board can give out.
    PlanTooLarge { tasks: usize, levels: usize },
}

impl fmt::Display for ScheduleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScheduleError::DuplicatePriority {
                first,
                second,
                priority,
            } => write!(
                f,
                "tasks `{}` and `{}` both use priority {}",
                first, second, priority.0
            ),
            ScheduleError::UnknownTask(name) => write!(f, "task `{}` is not in the plan", name),
            ScheduleError::PlanTooLarge { tasks, levels } => write!(
                f,
                "{} tasks do not fit in {} preemption levels",
                tasks, levels
            ),
        }
    }
}

/// Reject plans where two tasks share a priority.
pub fn check_plan(plan: &[TaskSpec]) -> Result<(), ScheduleError> {
    for (i, first) in plan.iter().enumerate() {
        if let Some(second) = plan[i + 1..]
            .iter()
            .find(|other| other.priority == first.priority)
        {
            return Err(ScheduleError::DuplicatePriority {
                first: first.name,
                second: second.name,
                priority: first.priority,
            });
        }
    }
    Ok(())
}

/// Number of tasks in `plan` that preempt `task`. Zero is the most urgent.
pub fn urgency_rank(plan: &[TaskSpec], task: &TaskSpec) -> Result<usize, ScheduleError> {
    if !plan.iter().any(|t| t.name == task.name) {
        return Err(ScheduleError::UnknownTask(task.name));
    }
    Ok(plan
        .iter()
        .filter(|other| other.priority.preempts(task.priority))
        .count())
}

/// Index into a table of `levels` interrupt priorities, most urgent first,
/// for the executor hosting `task`.
pub fn preemption_level(
    plan: &[TaskSpec],
    task: &TaskSpec,
    levels: usize,
) -> Result<usize, ScheduleError> {
    if plan.len() > levels {
        return Err(ScheduleError::PlanTooLarge {
            tasks: plan.len(),
            levels,
        });
    }
    check_plan(plan)?;
    urgency_rank(plan, task)
}

/// Convert an hours/minutes/seconds/milliseconds delay to milliseconds.
pub const fn hmsm(hours: u8, minutes: u8, seconds: u8, millis: u16) -> u32 {
    hours as u32 * 3_600_000 + minutes as u32 * 60_000 + seconds as u32 * 1_000 + millis as u32
}

/// Delay expressed as hours, minutes, seconds and milliseconds.
#[allow(async_fn_in_trait)]
pub trait DelayHmsm: DelayNs {
    async fn delay_hmsm(&mut self, hours: u8, minutes: u8, seconds: u8, millis: u16) {
        self.delay_ms(hmsm(hours, minutes, seconds, millis)).await
    }
}

impl<T: DelayNs> DelayHmsm for T {}
