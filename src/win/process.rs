//! Process names for window owners.

use log::warn;
use windows::Win32::Foundation::{CloseHandle, HANDLE};
use windows::Win32::System::ProcessStatus::{GetModuleBaseNameW, GetProcessImageFileNameW};
use windows::Win32::System::Threading::{
    OpenProcess, PROCESS_ACCESS_RIGHTS, PROCESS_QUERY_INFORMATION, PROCESS_QUERY_LIMITED_INFORMATION,
    PROCESS_VM_READ,
};

use crate::error::{Error, Result};
use crate::types::WindowHandle;
use crate::win::window;

const MAX_PATH_CHARS: usize = 1024;

/// Open process handle, closed on drop.
struct ProcessHandle(HANDLE);

impl ProcessHandle {
    fn open(process_id: u32, access: PROCESS_ACCESS_RIGHTS) -> Result<Self> {
        if process_id == 0 {
            return Err(Error::InvalidArgument("process id 0".to_string()));
        }
        Ok(ProcessHandle(unsafe { OpenProcess(access, false, process_id)? }))
    }
}

impl Drop for ProcessHandle {
    fn drop(&mut self) {
        if let Err(e) = unsafe { CloseHandle(self.0) } {
            warn!("Failed to close process handle: {}", e);
        }
    }
}

/// Native (`\Device\HarddiskVolumeN\...`) path of the process image.
pub fn image_file_name(process_id: u32) -> Result<String> {
    let process = ProcessHandle::open(process_id, PROCESS_QUERY_LIMITED_INFORMATION)?;
    let mut buf = vec![0u16; MAX_PATH_CHARS];
    let len = unsafe { GetProcessImageFileNameW(process.0, &mut buf) };
    if len == 0 {
        return Err(windows::core::Error::from_win32().into());
    }
    Ok(String::from_utf16_lossy(&buf[..len as usize]))
}

/// Executable file name, e.g. `notepad.exe`.
pub fn base_name(process_id: u32) -> Result<String> {
    let process = ProcessHandle::open(process_id, PROCESS_QUERY_INFORMATION | PROCESS_VM_READ)?;
    let mut buf = vec![0u16; MAX_PATH_CHARS];
    let len = unsafe { GetModuleBaseNameW(process.0, None, &mut buf) };
    if len == 0 {
        return Err(windows::core::Error::from_win32().into());
    }
    Ok(String::from_utf16_lossy(&buf[..len as usize]))
}

pub fn window_process_name(window: WindowHandle) -> Result<String> {
    let (_, process_id) = window::thread_process_id(window);
    base_name(process_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_own_process() {
        let pid = std::process::id();
        assert!(base_name(pid).unwrap().to_ascii_lowercase().ends_with(".exe"));
        assert!(image_file_name(pid).unwrap().starts_with(r"\Device\"));
    }

    #[test]
    fn process_zero_is_rejected() {
        assert!(matches!(base_name(0), Err(Error::InvalidArgument(_))));
    }
}
