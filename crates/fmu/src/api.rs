//! FMI 1.0 Co-Simulation entry points.
//!
//! Every function null-checks its component, never unwinds into the host and
//! maps `ContractError` to `fmiError`.

#![allow(non_snake_case)]

use std::ffi::{c_char, CStr};
use std::panic::{self, AssertUnwindSafe};

use contracts::{ContractError, StepStatus};
use tracing::{error, warn};

use crate::instance::{FmuInstance, InstantiateArgs};
use crate::types::*;

const TYPES_PLATFORM: &CStr = c"default";
const VERSION: &CStr = c"1.0";

/// Run `f`, turning a panic into `fmiFatal`
fn guarded<F>(call: &'static str, f: F) -> FmiStatus
where
    F: FnOnce() -> FmiStatus,
{
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(status) => status,
        Err(_) => {
            error!(target: "fmi", call, "panic caught at FMI boundary");
            StepStatus::Fatal
        }
    }
}

fn with_instance<F>(c: FmiComponent, call: &'static str, f: F) -> FmiStatus
where
    F: FnOnce(&mut FmuInstance) -> FmiStatus,
{
    guarded(call, || {
        // SAFETY: non-null components are only produced by fmiInstantiateSlave
        // and stay valid until fmiFreeSlaveInstance.
        match unsafe { (c as *mut FmuInstance).as_mut() } {
            Some(instance) => {
                instance.log_call(call);
                f(instance)
            }
            None => {
                warn!(target: "fmi", call, "null component");
                StepStatus::Error
            }
        }
    })
}

fn status_of(call: &'static str, result: Result<(), ContractError>) -> FmiStatus {
    match result {
        Ok(()) => StepStatus::Ok,
        Err(e) => {
            warn!(target: "fmi", call, error = %e, "call rejected");
            StepStatus::Error
        }
    }
}

/// Borrow a host array; null is only accepted for an empty array
unsafe fn host_slice<'a, T>(ptr: *const T, len: usize) -> Result<&'a [T], ContractError> {
    if len == 0 {
        return Ok(&[]);
    }
    if ptr.is_null() {
        return Err(ContractError::ffi("null array with non-zero length"));
    }
    Ok(std::slice::from_raw_parts(ptr, len))
}

unsafe fn host_slice_mut<'a, T>(ptr: *mut T, len: usize) -> Result<&'a mut [T], ContractError> {
    if len == 0 {
        return Ok(&mut []);
    }
    if ptr.is_null() {
        return Err(ContractError::ffi("null array with non-zero length"));
    }
    Ok(std::slice::from_raw_parts_mut(ptr, len))
}

/// Owned copy of a host string; null reads as empty
unsafe fn host_string(ptr: FmiString) -> String {
    if ptr.is_null() {
        String::new()
    } else {
        CStr::from_ptr(ptr).to_string_lossy().into_owned()
    }
}

// ===== Inquiry =====

#[no_mangle]
pub extern "C" fn fmiGetTypesPlatform() -> *const c_char {
    TYPES_PLATFORM.as_ptr()
}

#[no_mangle]
pub extern "C" fn fmiGetVersion() -> *const c_char {
    VERSION.as_ptr()
}

#[no_mangle]
pub extern "C" fn fmiSetDebugLogging(c: FmiComponent, logging_on: FmiBoolean) -> FmiStatus {
    with_instance(c, "fmiSetDebugLogging", |inst| {
        inst.set_debug_logging(to_bool(logging_on))
    })
}

// ===== Lifecycle =====

/// # Safety
/// String arguments must be null or valid NUL-terminated strings.
#[no_mangle]
pub unsafe extern "C" fn fmiInstantiateSlave(
    instance_name: FmiString,
    fmu_guid: FmiString,
    fmu_location: FmiString,
    mime_type: FmiString,
    timeout: FmiReal,
    visible: FmiBoolean,
    interactive: FmiBoolean,
    _functions: FmiCallbackFunctions,
    logging_on: FmiBoolean,
) -> FmiComponent {
    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        let args = InstantiateArgs {
            instance_name: host_string(instance_name),
            guid: host_string(fmu_guid),
            location: host_string(fmu_location),
            mime_type: host_string(mime_type),
            timeout,
            visible: to_bool(visible),
            interactive: to_bool(interactive),
            logging_on: to_bool(logging_on),
        };
        let name = args.instance_name.clone();

        match FmuInstance::instantiate(args) {
            Ok(instance) => Box::into_raw(Box::new(instance)) as FmiComponent,
            Err(e) => {
                error!(target: "fmi", instance = %name, error = %e, "fmiInstantiateSlave failed");
                std::ptr::null_mut()
            }
        }
    }));

    result.unwrap_or_else(|_| {
        error!(target: "fmi", "panic caught in fmiInstantiateSlave");
        std::ptr::null_mut()
    })
}

#[no_mangle]
pub extern "C" fn fmiInitializeSlave(
    c: FmiComponent,
    start_time: FmiReal,
    stop_time_defined: FmiBoolean,
    stop_time: FmiReal,
) -> FmiStatus {
    with_instance(c, "fmiInitializeSlave", |inst| {
        let stop = to_bool(stop_time_defined).then_some(stop_time);
        inst.initialize(start_time, stop)
    })
}

#[no_mangle]
pub extern "C" fn fmiDoStep(
    c: FmiComponent,
    current_communication_point: FmiReal,
    communication_step_size: FmiReal,
    new_step: FmiBoolean,
) -> FmiStatus {
    with_instance(c, "fmiDoStep", |inst| {
        inst.do_step(
            current_communication_point,
            communication_step_size,
            to_bool(new_step),
        )
    })
}

#[no_mangle]
pub extern "C" fn fmiTerminateSlave(c: FmiComponent) -> FmiStatus {
    with_instance(c, "fmiTerminateSlave", |inst| inst.terminate())
}

#[no_mangle]
pub extern "C" fn fmiResetSlave(c: FmiComponent) -> FmiStatus {
    with_instance(c, "fmiResetSlave", |inst| inst.reset())
}

/// # Safety
/// `c` must be null or a component from `fmiInstantiateSlave` not yet freed.
#[no_mangle]
pub unsafe extern "C" fn fmiFreeSlaveInstance(c: FmiComponent) {
    if c.is_null() {
        return;
    }
    let _ = guarded("fmiFreeSlaveInstance", || {
        let instance = Box::from_raw(c as *mut FmuInstance);
        instance.log_call("fmiFreeSlaveInstance");
        drop(instance);
        StepStatus::Ok
    });
}

// ===== Scalar access =====

/// # Safety
/// `vr` and `value` must point to `nvr` elements (or be null with `nvr == 0`).
#[no_mangle]
pub unsafe extern "C" fn fmiGetReal(
    c: FmiComponent,
    vr: *const FmiValueReference,
    nvr: usize,
    value: *mut FmiReal,
) -> FmiStatus {
    with_instance(c, "fmiGetReal", |inst| {
        status_of(
            "fmiGetReal",
            host_slice(vr, nvr).and_then(|refs| {
                inst.model()
                    .value_table()
                    .get_reals(refs, host_slice_mut(value, nvr)?)
            }),
        )
    })
}

/// # Safety
/// `vr` and `value` must point to `nvr` elements (or be null with `nvr == 0`).
#[no_mangle]
pub unsafe extern "C" fn fmiGetInteger(
    c: FmiComponent,
    vr: *const FmiValueReference,
    nvr: usize,
    value: *mut FmiInteger,
) -> FmiStatus {
    with_instance(c, "fmiGetInteger", |inst| {
        status_of(
            "fmiGetInteger",
            host_slice(vr, nvr).and_then(|refs| {
                inst.model()
                    .value_table()
                    .get_integers(refs, host_slice_mut(value, nvr)?)
            }),
        )
    })
}

/// # Safety
/// `vr` and `value` must point to `nvr` elements (or be null with `nvr == 0`).
#[no_mangle]
pub unsafe extern "C" fn fmiGetBoolean(
    c: FmiComponent,
    vr: *const FmiValueReference,
    nvr: usize,
    value: *mut FmiBoolean,
) -> FmiStatus {
    with_instance(c, "fmiGetBoolean", |inst| {
        let result = host_slice(vr, nvr).and_then(|refs| {
            let out = host_slice_mut(value, nvr)?;
            let mut flags = vec![false; nvr];
            inst.model().value_table().get_booleans(refs, &mut flags)?;
            for (dst, flag) in out.iter_mut().zip(flags) {
                *dst = from_bool(flag);
            }
            Ok(())
        });
        status_of("fmiGetBoolean", result)
    })
}

/// # Safety
/// `vr` and `value` must point to `nvr` elements (or be null with `nvr == 0`).
/// Returned pointers stay valid until the next call on this instance.
#[no_mangle]
pub unsafe extern "C" fn fmiGetString(
    c: FmiComponent,
    vr: *const FmiValueReference,
    nvr: usize,
    value: *mut FmiString,
) -> FmiStatus {
    with_instance(c, "fmiGetString", |inst| {
        let result = host_slice(vr, nvr).and_then(|refs| {
            let out = host_slice_mut(value, nvr)?;
            let ptrs = inst.get_strings(refs)?;
            out.copy_from_slice(&ptrs);
            Ok(())
        });
        status_of("fmiGetString", result)
    })
}

/// # Safety
/// `vr` and `value` must point to `nvr` elements (or be null with `nvr == 0`).
#[no_mangle]
pub unsafe extern "C" fn fmiSetReal(
    c: FmiComponent,
    vr: *const FmiValueReference,
    nvr: usize,
    value: *const FmiReal,
) -> FmiStatus {
    with_instance(c, "fmiSetReal", |inst| {
        let result = host_slice(vr, nvr).and_then(|refs| {
            inst.model_mut()
                .value_table_mut()
                .set_reals(refs, host_slice(value, nvr)?)
        });
        status_of("fmiSetReal", result)
    })
}

/// # Safety
/// `vr` and `value` must point to `nvr` elements (or be null with `nvr == 0`).
#[no_mangle]
pub unsafe extern "C" fn fmiSetInteger(
    c: FmiComponent,
    vr: *const FmiValueReference,
    nvr: usize,
    value: *const FmiInteger,
) -> FmiStatus {
    with_instance(c, "fmiSetInteger", |inst| {
        let result = host_slice(vr, nvr).and_then(|refs| {
            inst.model_mut()
                .value_table_mut()
                .set_integers(refs, host_slice(value, nvr)?)
        });
        status_of("fmiSetInteger", result)
    })
}

/// # Safety
/// `vr` and `value` must point to `nvr` elements (or be null with `nvr == 0`).
#[no_mangle]
pub unsafe extern "C" fn fmiSetBoolean(
    c: FmiComponent,
    vr: *const FmiValueReference,
    nvr: usize,
    value: *const FmiBoolean,
) -> FmiStatus {
    with_instance(c, "fmiSetBoolean", |inst| {
        let result = host_slice(vr, nvr).and_then(|refs| {
            let flags: Vec<bool> = host_slice(value, nvr)?.iter().map(|&v| to_bool(v)).collect();
            inst.model_mut()
                .value_table_mut()
                .set_booleans(refs, &flags)
        });
        status_of("fmiSetBoolean", result)
    })
}

/// # Safety
/// `vr` and `value` must point to `nvr` elements (or be null with `nvr == 0`);
/// each string must be null or NUL-terminated.
#[no_mangle]
pub unsafe extern "C" fn fmiSetString(
    c: FmiComponent,
    vr: *const FmiValueReference,
    nvr: usize,
    value: *const FmiString,
) -> FmiStatus {
    with_instance(c, "fmiSetString", |inst| {
        let result = host_slice(vr, nvr).and_then(|refs| {
            let strings: Vec<String> = host_slice(value, nvr)?
                .iter()
                .map(|&p| host_string(p))
                .collect();
            inst.model_mut()
                .value_table_mut()
                .set_strings(refs, &strings)
        });
        status_of("fmiSetString", result)
    })
}

// ===== Unsupported features (derivatives, async step, status inquiry) =====

#[no_mangle]
pub extern "C" fn fmiSetRealInputDerivatives(
    c: FmiComponent,
    _vr: *const FmiValueReference,
    _nvr: usize,
    _order: *const FmiInteger,
    _value: *const FmiReal,
) -> FmiStatus {
    with_instance(c, "fmiSetRealInputDerivatives", |_| StepStatus::Error)
}

#[no_mangle]
pub extern "C" fn fmiGetRealOutputDerivatives(
    c: FmiComponent,
    _vr: *const FmiValueReference,
    _nvr: usize,
    _order: *const FmiInteger,
    _value: *mut FmiReal,
) -> FmiStatus {
    with_instance(c, "fmiGetRealOutputDerivatives", |_| StepStatus::Error)
}

#[no_mangle]
pub extern "C" fn fmiCancelStep(c: FmiComponent) -> FmiStatus {
    with_instance(c, "fmiCancelStep", |_| StepStatus::Ok)
}

#[no_mangle]
pub extern "C" fn fmiGetStatus(
    c: FmiComponent,
    _kind: FmiStatusKind,
    _value: *mut FmiStatus,
) -> FmiStatus {
    with_instance(c, "fmiGetStatus", |_| StepStatus::Discard)
}

#[no_mangle]
pub extern "C" fn fmiGetRealStatus(
    c: FmiComponent,
    _kind: FmiStatusKind,
    _value: *mut FmiReal,
) -> FmiStatus {
    with_instance(c, "fmiGetRealStatus", |_| StepStatus::Discard)
}

#[no_mangle]
pub extern "C" fn fmiGetIntegerStatus(
    c: FmiComponent,
    _kind: FmiStatusKind,
    _value: *mut FmiInteger,
) -> FmiStatus {
    with_instance(c, "fmiGetIntegerStatus", |_| StepStatus::Discard)
}

#[no_mangle]
pub extern "C" fn fmiGetBooleanStatus(
    c: FmiComponent,
    _kind: FmiStatusKind,
    _value: *mut FmiBoolean,
) -> FmiStatus {
    with_instance(c, "fmiGetBooleanStatus", |_| StepStatus::Discard)
}

#[no_mangle]
pub extern "C" fn fmiGetStringStatus(
    c: FmiComponent,
    _kind: FmiStatusKind,
    _value: *mut FmiString,
) -> FmiStatus {
    with_instance(c, "fmiGetStringStatus", |_| StepStatus::Discard)
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::vr;
    use std::ptr;

    unsafe fn instantiate() -> FmiComponent {
        fmiInstantiateSlave(
            c"sensor".as_ptr(),
            c"{guid}".as_ptr(),
            ptr::null(),
            c"application/x-fmu-sharedlibrary".as_ptr(),
            0.0,
            FMI_FALSE,
            FMI_FALSE,
            FmiCallbackFunctions::default(),
            FMI_TRUE,
        )
    }

    #[test]
    fn test_inquiry_strings() {
        let platform = unsafe { CStr::from_ptr(fmiGetTypesPlatform()) };
        let version = unsafe { CStr::from_ptr(fmiGetVersion()) };
        assert_eq!(platform.to_str().unwrap(), "default");
        assert_eq!(version.to_str().unwrap(), "1.0");
    }

    #[test]
    fn test_null_component_is_error() {
        assert_eq!(fmiDoStep(ptr::null_mut(), 0.0, 1.0, FMI_TRUE), StepStatus::Error);
        assert_eq!(fmiTerminateSlave(ptr::null_mut()), StepStatus::Error);
        unsafe { fmiFreeSlaveInstance(ptr::null_mut()) };
    }

    #[test]
    fn test_step_and_read_slots() {
        unsafe {
            let c = instantiate();
            assert!(!c.is_null());
            assert_eq!(fmiInitializeSlave(c, 0.0, FMI_FALSE, 0.0), StepStatus::Ok);
            assert_eq!(fmiDoStep(c, 0.0, 1.0, FMI_TRUE), StepStatus::Ok);

            let refs = [vr::BOOLEAN_VALID];
            let mut valid = [FMI_FALSE];
            assert_eq!(
                fmiGetBoolean(c, refs.as_ptr(), 1, valid.as_mut_ptr()),
                StepStatus::Ok
            );
            assert_eq!(valid[0], FMI_TRUE);

            let refs = [vr::INTEGER_COUNT, vr::INTEGER_SENSORDATA_OUT_SIZE];
            let mut out = [0; 2];
            assert_eq!(fmiGetInteger(c, refs.as_ptr(), 2, out.as_mut_ptr()), StepStatus::Ok);
            assert_eq!(out[0], 10);
            assert!(out[1] > 0);

            assert_eq!(fmiTerminateSlave(c), StepStatus::Ok);
            fmiFreeSlaveInstance(c);
        }
    }

    #[test]
    fn test_out_of_range_reference_is_error() {
        unsafe {
            let c = instantiate();
            let refs = [0, 7];
            let values = [1, 2];
            assert_eq!(
                fmiSetInteger(c, refs.as_ptr(), 2, values.as_ptr()),
                StepStatus::Error
            );

            let mut out = [42];
            assert_eq!(fmiGetInteger(c, refs.as_ptr(), 1, out.as_mut_ptr()), StepStatus::Ok);
            assert_eq!(out[0], 0);
            fmiFreeSlaveInstance(c);
        }
    }

    #[test]
    fn test_null_value_array_is_error() {
        unsafe {
            let c = instantiate();
            let refs = [0];
            assert_eq!(
                fmiGetReal(c, refs.as_ptr(), 1, ptr::null_mut()),
                StepStatus::Error
            );
            assert_eq!(fmiGetReal(c, ptr::null(), 0, ptr::null_mut()), StepStatus::Ok);
            fmiFreeSlaveInstance(c);
        }
    }

    #[test]
    fn test_string_round_trip() {
        unsafe {
            let c = instantiate();
            let refs = [0];
            let input = [c"hello".as_ptr()];
            assert_eq!(fmiSetString(c, refs.as_ptr(), 1, input.as_ptr()), StepStatus::Ok);

            let mut out: [FmiString; 1] = [ptr::null()];
            assert_eq!(fmiGetString(c, refs.as_ptr(), 1, out.as_mut_ptr()), StepStatus::Ok);
            assert_eq!(CStr::from_ptr(out[0]).to_str().unwrap(), "hello");
            fmiFreeSlaveInstance(c);
        }
    }

    #[test]
    fn test_unsupported_functions() {
        unsafe {
            let c = instantiate();
            assert_eq!(fmiCancelStep(c), StepStatus::Ok);
            assert_eq!(fmiGetStatus(c, 0, ptr::null_mut()), StepStatus::Discard);
            assert_eq!(fmiGetRealStatus(c, 2, ptr::null_mut()), StepStatus::Discard);
            assert_eq!(
                fmiSetRealInputDerivatives(c, ptr::null(), 0, ptr::null(), ptr::null()),
                StepStatus::Error
            );
            assert_eq!(fmiResetSlave(c), StepStatus::Ok);
            fmiFreeSlaveInstance(c);
        }
    }
}
