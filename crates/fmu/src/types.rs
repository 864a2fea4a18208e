//! FMI 1.0 Co-Simulation platform types (`fmiPlatformTypes.h`, `fmiFunctions.h`).

use std::ffi::{c_char, c_uint, c_void};

pub use contracts::StepStatus as FmiStatus;

pub type FmiComponent = *mut c_void;
pub type FmiValueReference = c_uint;
pub type FmiReal = f64;
pub type FmiInteger = i32;
pub type FmiBoolean = c_char;
pub type FmiString = *const c_char;

pub const FMI_TRUE: FmiBoolean = 1;
pub const FMI_FALSE: FmiBoolean = 0;

/// `fmiStatusKind`, kept as a raw integer since hosts may pass any value
pub type FmiStatusKind = i32;

pub type FmiCallbackLogger = unsafe extern "C" fn(
    c: FmiComponent,
    instance_name: FmiString,
    status: FmiStatus,
    category: FmiString,
    message: FmiString,
    ...
);
pub type FmiCallbackAllocateMemory = unsafe extern "C" fn(nobj: usize, size: usize) -> *mut c_void;
pub type FmiCallbackFreeMemory = unsafe extern "C" fn(obj: *mut c_void);
pub type FmiStepFinished = unsafe extern "C" fn(c: FmiComponent, status: FmiStatus);

/// Host callback table passed by value to `fmiInstantiateSlave`
#[repr(C)]
#[derive(Clone, Copy, Default)]
pub struct FmiCallbackFunctions {
    pub logger: Option<FmiCallbackLogger>,
    pub allocate_memory: Option<FmiCallbackAllocateMemory>,
    pub free_memory: Option<FmiCallbackFreeMemory>,
    pub step_finished: Option<FmiStepFinished>,
}

#[inline]
pub fn to_bool(value: FmiBoolean) -> bool {
    value != FMI_FALSE
}

#[inline]
pub fn from_bool(value: bool) -> FmiBoolean {
    if value {
        FMI_TRUE
    } else {
        FMI_FALSE
    }
}
