use std::ffi::{c_void, OsString};
use std::mem::MaybeUninit;
use std::os::windows::prelude::OsStringExt;
use std::ptr::null;

use windows as Windows;
use Windows::core::Interface;
use Windows::Win32::Foundation::PWSTR;
use Windows::Win32::System::Com::{CoInitialize, CoTaskMemFree, CoUninitialize};

/// Keeps COM initialized on the current thread for as long as it lives.
pub struct Apartment {
    _not_send: std::marker::PhantomData<*const ()>,
}

impl Apartment {
    pub fn enter() -> windows::core::Result<Self> {
        unsafe { CoInitialize(null()) }?;
        Ok(Self {
            _not_send: std::marker::PhantomData,
        })
    }
}

impl Drop for Apartment {
    fn drop(&mut self) {
        unsafe { CoUninitialize() }
    }
}

pub unsafe fn from_wide(s: &PWSTR) -> OsString {
    let len = (0..).take_while(|&i| *s.0.offset(i) != 0).count();
    let slice = std::slice::from_raw_parts(s.0, len);
    OsString::from_wide(slice)
}

pub unsafe fn next_obj<I: Interface, R: Interface>(
    intf: &I,
    f: unsafe fn(&I, u32, *mut Option<R>, *mut u32) -> windows::core::Result<()>,
) -> windows::core::Result<Option<R>> {
    let mut result = MaybeUninit::uninit();
    let mut fetched = MaybeUninit::uninit();
    f(intf, 1, result.as_mut_ptr(), fetched.as_mut_ptr())?;
    Ok(if fetched.assume_init() > 0 {
        result.assume_init()
    } else {
        None
    })
}

/// A string allocated by COM, freed with `CoTaskMemFree` on drop.
pub struct ComString(PWSTR);

impl ComString {
    pub unsafe fn from_raw(ptr: PWSTR) -> Self {
        Self(ptr)
    }

    pub fn to_os_string(&self) -> OsString {
        unsafe { from_wide(&self.0) }
    }
}

impl Drop for ComString {
    fn drop(&mut self) {
        unsafe { CoTaskMemFree(self.0 .0 as *const c_void) }
    }
}
