//! Console output for the page shell. On wasm these write to the browser
//! console; native builds type-check the format string and print nothing.

#[cfg(target_family = "wasm")]
macro_rules! console_warn {
    ($($arg:tt)*) => {
        web_sys::console::warn_1(&format!($($arg)*).into())
    };
}

#[cfg(not(target_family = "wasm"))]
macro_rules! console_warn {
    ($($arg:tt)*) => {
        if false { let _ = format_args!($($arg)*); }
    };
}

#[cfg(target_family = "wasm")]
macro_rules! console_log {
    ($($arg:tt)*) => {
        web_sys::console::log_1(&format!($($arg)*).into())
    };
}

#[cfg(not(target_family = "wasm"))]
macro_rules! console_log {
    ($($arg:tt)*) => {
        if false { let _ = format_args!($($arg)*); }
    };
}

pub(crate) use {console_log, console_warn};
