use embassy_stm32::interrupt::Priority;

use crate::schedule::{ScheduleError, TaskSpec, preemption_level};

/// NVIC levels handed to interrupt executors, most urgent first.
/// P0 stays free for the time driver.
const LEVELS: [Priority; 8] = [
    Priority::P1,
    Priority::P2,
    Priority::P3,
    Priority::P4,
    Priority::P5,
    Priority::P6,
    Priority::P7,
    Priority::P8,
];

/// Interrupt priority for the executor that runs `task`.
pub fn interrupt_priority(plan: &[TaskSpec], task: &TaskSpec) -> Result<Priority, ScheduleError> {
    let level = preemption_level(plan, task, LEVELS.len())?;
    Ok(LEVELS[level])
}
