//! Host Compute Network backed implementation of [`HostNetworkService`]

use super::ffi::{self, GUID, HCN_NETWORK, HRESULT, PWSTR};
use super::service::{HostError, HostNetworkService, NetworkId};
use std::ffi::c_void;
use std::ptr;

/// Open HCN network handle
#[derive(Debug)]
pub struct HcnNetwork(HCN_NETWORK);

/// Calls into computenetwork.dll
#[derive(Debug, Default)]
pub struct HcnService;

impl HostNetworkService for HcnService {
    type Handle = HcnNetwork;

    fn open_network(&self, id: &NetworkId) -> Result<HcnNetwork, HostError> {
        let guid = GUID::from(id.as_uuid());
        let mut network: HCN_NETWORK = ptr::null_mut();
        let mut record: PWSTR = ptr::null_mut();

        let hr = unsafe { ffi::HcnOpenNetwork(&guid, &mut network, &mut record) };
        let message = take_error_record(record);

        check(hr, message).map(|_| HcnNetwork(network))
    }

    fn close_network(&self, handle: HcnNetwork) -> Result<(), HostError> {
        if handle.0.is_null() {
            return Ok(());
        }

        let hr = unsafe { ffi::HcnCloseNetwork(handle.0) };
        check(hr, None)
    }

    fn delete_network(&self, id: &NetworkId) -> Result<(), HostError> {
        let guid = GUID::from(id.as_uuid());
        let mut record: PWSTR = ptr::null_mut();

        let hr = unsafe { ffi::HcnDeleteNetwork(&guid, &mut record) };
        let message = take_error_record(record);

        check(hr, message)
    }

    fn create_network(&self, id: &NetworkId, settings: &str) -> Result<HcnNetwork, HostError> {
        let guid = GUID::from(id.as_uuid());
        let wide = to_wide(settings);
        let mut network: HCN_NETWORK = ptr::null_mut();
        let mut record: PWSTR = ptr::null_mut();

        let hr = unsafe { ffi::HcnCreateNetwork(&guid, wide.as_ptr(), &mut network, &mut record) };
        let message = take_error_record(record);

        check(hr, message).map(|_| HcnNetwork(network))
    }
}

/// Map an HRESULT to a host error, preferring the error record text
fn check(hr: HRESULT, record: Option<String>) -> Result<(), HostError> {
    if hr == ffi::S_OK {
        return Ok(());
    }

    let message = record
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| format!("HRESULT 0x{:08X}", hr as u32));

    match hr {
        ffi::HCN_E_NETWORK_NOT_FOUND | ffi::E_FILE_NOT_FOUND | ffi::E_NOT_FOUND => {
            Err(HostError::NotFound(message))
        }
        _ => Err(HostError::Failed(message)),
    }
}

/// Copy and free an error record returned by HCN
fn take_error_record(record: PWSTR) -> Option<String> {
    if record.is_null() {
        return None;
    }

    let text = unsafe {
        let mut len = 0;
        while *record.add(len) != 0 {
            len += 1;
        }
        String::from_utf16_lossy(std::slice::from_raw_parts(record, len))
    };

    unsafe { ffi::CoTaskMemFree(record as *const c_void) };

    Some(text)
}

/// NUL-terminated UTF-16 copy of `s`
fn to_wide(s: &str) -> Vec<u16> {
    s.encode_utf16().chain(std::iter::once(0)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_maps_not_found() {
        let err = check(ffi::HCN_E_NETWORK_NOT_FOUND, None).unwrap_err();
        assert_eq!(err, HostError::NotFound("HRESULT 0x803B0001".to_string()));
    }

    #[test]
    fn test_check_keeps_record_text() {
        let err = check(0x8007_0005_u32 as HRESULT, Some("Access is denied.".into())).unwrap_err();
        assert_eq!(err, HostError::Failed("Access is denied.".to_string()));
    }

    #[test]
    fn test_to_wide_terminates() {
        assert_eq!(to_wide("ab"), vec![b'a' as u16, b'b' as u16, 0]);
    }
}
