pub mod copy;
pub mod queue;
pub mod storage;
pub mod tasks;
