//! Convenience macros over the package-level functions.
//!
//! The plain and `*ln` macros take any number of `Display` values:
//!
//! ```no_run
//! tierlog::info!("listening on port ", 8080);
//! tierlog::warningf!("retry {} of {}", 2, 5);
//! ```
//!
//! Prefixing the arguments with `logger =>` logs through that logger instead
//! of the global one:
//!
//! ```no_run
//! # let logger = tierlog::Logger::new(tierlog::LogConfig::default()).unwrap();
//! tierlog::error!(logger => "lost connection to ", "db-1");
//! ```

#[doc(hidden)]
#[macro_export]
macro_rules! __log_parts {
    ($func:ident; $logger:expr => $($arg:expr),* $(,)?) => {
        $logger.$func(&[$(&$arg as &dyn ::std::fmt::Display),*])
    };
    ($func:ident; $($arg:expr),* $(,)?) => {
        $crate::$func(&[$(&$arg as &dyn ::std::fmt::Display),*])
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __log_format {
    ($func:ident; $logger:expr => $($arg:tt)+) => {
        $logger.$func(::std::format_args!($($arg)+))
    };
    ($func:ident; $($arg:tt)+) => {
        $crate::$func(::std::format_args!($($arg)+))
    };
}

#[macro_export]
macro_rules! trace {
    ($($t:tt)*) => { $crate::__log_parts!(trace; $($t)*) };
}

#[macro_export]
macro_rules! tracef {
    ($($t:tt)+) => { $crate::__log_format!(tracef; $($t)+) };
}

#[macro_export]
macro_rules! traceln {
    ($($t:tt)*) => { $crate::__log_parts!(traceln; $($t)*) };
}

#[macro_export]
macro_rules! debug {
    ($($t:tt)*) => { $crate::__log_parts!(debug; $($t)*) };
}

#[macro_export]
macro_rules! debugf {
    ($($t:tt)+) => { $crate::__log_format!(debugf; $($t)+) };
}

#[macro_export]
macro_rules! debugln {
    ($($t:tt)*) => { $crate::__log_parts!(debugln; $($t)*) };
}

#[macro_export]
macro_rules! info {
    ($($t:tt)*) => { $crate::__log_parts!(info; $($t)*) };
}

#[macro_export]
macro_rules! infof {
    ($($t:tt)+) => { $crate::__log_format!(infof; $($t)+) };
}

#[macro_export]
macro_rules! infoln {
    ($($t:tt)*) => { $crate::__log_parts!(infoln; $($t)*) };
}

#[macro_export]
macro_rules! warning {
    ($($t:tt)*) => { $crate::__log_parts!(warning; $($t)*) };
}

#[macro_export]
macro_rules! warningf {
    ($($t:tt)+) => { $crate::__log_format!(warningf; $($t)+) };
}

#[macro_export]
macro_rules! warningln {
    ($($t:tt)*) => { $crate::__log_parts!(warningln; $($t)*) };
}

#[macro_export]
macro_rules! error {
    ($($t:tt)*) => { $crate::__log_parts!(error; $($t)*) };
}

#[macro_export]
macro_rules! errorf {
    ($($t:tt)+) => { $crate::__log_format!(errorf; $($t)+) };
}

#[macro_export]
macro_rules! errorln {
    ($($t:tt)*) => { $crate::__log_parts!(errorln; $($t)*) };
}

/// Logs at `fatal` and exits the process with status 1.
#[macro_export]
macro_rules! fatal {
    ($($t:tt)*) => { $crate::__log_parts!(fatal; $($t)*) };
}

#[macro_export]
macro_rules! fatalf {
    ($($t:tt)+) => { $crate::__log_format!(fatalf; $($t)+) };
}

#[macro_export]
macro_rules! fatalln {
    ($($t:tt)*) => { $crate::__log_parts!(fatalln; $($t)*) };
}

/// Writes to every enabled sink regardless of thresholds.
#[macro_export]
macro_rules! print_log {
    ($($t:tt)*) => { $crate::__log_parts!(print; $($t)*) };
}

#[macro_export]
macro_rules! printf_log {
    ($($t:tt)+) => { $crate::__log_format!(printf; $($t)+) };
}

#[macro_export]
macro_rules! println_log {
    ($($t:tt)*) => { $crate::__log_parts!(println; $($t)*) };
}
