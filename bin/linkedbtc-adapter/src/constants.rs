pub(crate) const SERVICE_NAME: &str = "linkedbtc-adapter";

pub(crate) const DEFAULT_THREAD_COUNT: u8 = 4;

pub(crate) const DEFAULT_THREAD_STACK_SIZE: usize = 8 * 1024 * 1024;
