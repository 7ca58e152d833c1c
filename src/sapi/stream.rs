use std::ffi::c_void;
use std::ptr::null;

use windows as Windows;
use Windows::core::{GUID, HRESULT};
use Windows::Win32::Foundation::E_OUTOFMEMORY;
use Windows::Win32::Media::Speech::{ISpStream, SpStream};
use Windows::Win32::System::Com::{CoCreateInstance, IStream, CLSCTX_ALL, STREAM_SEEK_SET};
use Windows::Win32::UI::Shell::SHCreateMemStream;

use crate::audio::AudioFormat;

#[allow(non_upper_case_globals)]
const SPDFID_WaveFormatEx: GUID = GUID::from_u128(0xc31adbae_527f_4ff5_a230_f62bb61ff70c);

const READ_CHUNK: usize = 64 * 1024;

/// A growable COM stream backed by memory.
pub struct MemoryStream {
    intf: IStream,
}

impl MemoryStream {
    pub fn new(init_data: Option<&[u8]>) -> windows::core::Result<Self> {
        Ok(Self {
            intf: Self::create_stream(init_data)?,
        })
    }

    /// Wraps the stream in an audio stream that carries the given PCM format.
    pub fn with_format(&self, format: &AudioFormat) -> windows::core::Result<ISpStream> {
        let intf: ISpStream = unsafe { CoCreateInstance(&SpStream, None, CLSCTX_ALL) }?;
        unsafe { intf.SetBaseStream(self.intf.clone(), &SPDFID_WaveFormatEx, &format.to_sapi()) }?;
        Ok(intf)
    }

    /// Reads the whole stream from the beginning.
    pub fn read_all(&self) -> windows::core::Result<Vec<u8>> {
        unsafe { self.intf.Seek(0, STREAM_SEEK_SET) }?;
        let mut data = Vec::new();
        let mut chunk = vec![0u8; READ_CHUNK];
        loop {
            let mut read = 0u32;
            unsafe {
                self.intf.Read(chunk.as_mut_ptr() as *mut c_void, chunk.len() as u32, &mut read)
            }
            .ok()?;
            if read == 0 {
                break;
            }
            data.extend_from_slice(&chunk[..read as usize]);
        }
        Ok(data)
    }

    fn create_stream(init_data: Option<&[u8]>) -> std::result::Result<IStream, HRESULT> {
        let size =
            init_data.map(|buf| buf.len()).unwrap_or(0).try_into().map_err(|_| E_OUTOFMEMORY)?;
        unsafe { SHCreateMemStream(init_data.map(|buf| buf.as_ptr()).unwrap_or(null()), size) }
            .ok_or(E_OUTOFMEMORY)
    }
}
