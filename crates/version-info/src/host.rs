//! Identity of the runtime hosting the interpreter.

use std::env;

pub const VM_NAME_ENV: &str = "JVPY_VM_NAME";
pub const VM_VENDOR_ENV: &str = "JVPY_VM_VENDOR";

/// Toolchain identity captured at build time (e.g. "rustc 1.80.0 (051478957 2024-07-21)").
pub const BUILD_HOST_NAME: &str = env!("JVPY_BUILD_HOST_NAME");

const UNKNOWN_VENDOR: &str = "unknown";

/// Source of the runtime name and vendor. Values are read on every call.
pub trait HostEnvironment {
    fn vm_name(&self) -> String;

    fn vm_vendor(&self) -> String;
}

/// Reads the live process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnvironment;

impl HostEnvironment for ProcessEnvironment {
    fn vm_name(&self) -> String {
        non_empty_var(VM_NAME_ENV).unwrap_or_else(|| BUILD_HOST_NAME.to_string())
    }

    fn vm_vendor(&self) -> String {
        non_empty_var(VM_VENDOR_ENV).unwrap_or_else(|| UNKNOWN_VENDOR.to_string())
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.is_empty())
}

/// `[<name> (<vendor>)]`
pub fn describe(host: &dyn HostEnvironment) -> String {
    format!("[{} ({})]", host.vm_name(), host.vm_vendor())
}
