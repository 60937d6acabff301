#[macro_export]
macro_rules! debug {
    ($($args:tt)*) => {};
}

#[macro_export]
macro_rules! trace {
    ($($args:tt)*) => {};
}

#[macro_export]
macro_rules! warn {
    ($($args:tt)*) => {};
}

#[macro_export]
macro_rules! instrument {
    ($($args:tt)*) => {};
}
