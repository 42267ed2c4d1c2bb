use serde::{Deserialize, Serialize};

/// The compute platform launches at most this many tasks per call.
pub const MAX_LAUNCH_PER_CALL: usize = 10;

/// Static per-queue scaling configuration. Carried on every controller
/// invocation; nothing persists between invocations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScalingLimits {
    /// Upper bound on the worker fleet for this queue.
    pub max_tasks: usize,
    /// Backlog budget one worker is expected to absorb.
    pub max_backlog_per_task: usize,
    /// Maximum number of new workers one controller tick may request.
    pub step_size: usize,
}

/// One tick's scale-up verdict, derived purely from a single observation
/// of queue depth and running-task count.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScalingDecision {
    pub current_running: usize,
    pub desired_running: usize,
    pub to_launch: usize,
}

impl ScalingDecision {
    fn no_op(current_running: usize, desired_running: usize) -> Self {
        Self {
            current_running,
            desired_running,
            to_launch: 0,
        }
    }
}

/// Computes the bounded incremental scale-up for one backlog observation.
///
/// Scale-down is never proposed; workers self-terminate once their queue
/// drains. The function is stateless, so duplicate or overlapping
/// invocations can at worst over-launch by one step and self-correct on
/// the next tick once the running count catches up.
pub fn plan_scale_up(
    queue_depth: u64,
    current_running: usize,
    limits: &ScalingLimits,
) -> ScalingDecision {
    if queue_depth == 0 {
        return ScalingDecision::no_op(current_running, 0);
    }
    if current_running >= limits.max_tasks {
        return ScalingDecision::no_op(current_running, current_running);
    }

    let backlog_per_task = limits.max_backlog_per_task.max(1) as u64;
    let remaining_tasks = usize::try_from(queue_depth.div_ceil(backlog_per_task))
        .unwrap_or(limits.max_tasks);
    let desired_running = remaining_tasks.min(limits.max_tasks);

    if current_running >= desired_running {
        return ScalingDecision::no_op(current_running, desired_running);
    }

    let to_launch = if current_running + limits.step_size > desired_running {
        desired_running - current_running
    } else {
        limits.step_size
    };

    ScalingDecision {
        current_running,
        desired_running,
        to_launch: to_launch.min(MAX_LAUNCH_PER_CALL),
    }
}
