use std::ffi::OsString;
use std::ptr::null_mut;

use windows as Windows;
use Windows::Win32::Foundation::PWSTR;
use Windows::Win32::Media::Speech::{
    IEnumSpObjectTokens, ISpObjectToken, ISpObjectTokenCategory, SpObjectTokenCategory,
};
use Windows::Win32::System::Com::{CoCreateInstance, CLSCTX_ALL};

use super::com::{next_obj, ComString};

pub const VOICES_CATEGORY: &str = r"HKEY_LOCAL_MACHINE\SOFTWARE\Microsoft\Speech\Voices";

/// A registered SAPI object, such as a voice.
pub struct Token {
    pub intf: ISpObjectToken,
}

impl Token {
    pub fn attr(&self, name: &str) -> windows::core::Result<OsString> {
        let attrs = unsafe { self.intf.OpenKey("Attributes") }?;
        let value = unsafe { ComString::from_raw(attrs.GetStringValue(name)?) };
        Ok(value.to_os_string())
    }

    pub fn str_attr(&self, name: &str) -> Option<String> {
        self.attr(name).ok().map(|value| value.to_string_lossy().into_owned())
    }
}

pub struct Tokens {
    intf: IEnumSpObjectTokens,
}

impl Iterator for Tokens {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        unsafe { next_obj(&self.intf, IEnumSpObjectTokens::Next) }.ok()?.map(|intf| Token {
            intf,
        })
    }
}

pub struct Category {
    intf: ISpObjectTokenCategory,
}

impl Category {
    pub fn new(id: &str) -> windows::core::Result<Self> {
        let intf: ISpObjectTokenCategory =
            unsafe { CoCreateInstance(&SpObjectTokenCategory, None, CLSCTX_ALL) }?;
        unsafe { intf.SetId(id, false) }?;
        Ok(Self {
            intf,
        })
    }

    /// Enumerates the tokens that have all the `required` attributes.
    pub fn enum_tokens(&self, required: &str) -> windows::core::Result<Tokens> {
        unsafe { self.intf.EnumTokens(required, PWSTR(null_mut())) }.map(|intf| Tokens {
            intf,
        })
    }
}
