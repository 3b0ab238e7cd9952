//! Raw bindings for the Host Compute Network API (computenetwork.dll)

#![allow(non_snake_case, non_camel_case_types, clippy::upper_case_acronyms)]

use std::ffi::c_void;

pub type HRESULT = i32;
pub type PWSTR = *mut u16;
pub type PCWSTR = *const u16;
pub type HCN_NETWORK = *mut c_void;

pub const S_OK: HRESULT = 0;

/// HCN_E_NETWORK_NOT_FOUND
pub const HCN_E_NETWORK_NOT_FOUND: HRESULT = 0x803B_0001_u32 as HRESULT;
/// HRESULT_FROM_WIN32(ERROR_FILE_NOT_FOUND)
pub const E_FILE_NOT_FOUND: HRESULT = 0x8007_0002_u32 as HRESULT;
/// HRESULT_FROM_WIN32(ERROR_NOT_FOUND)
pub const E_NOT_FOUND: HRESULT = 0x8007_0490_u32 as HRESULT;

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct GUID {
    pub data1: u32,
    pub data2: u16,
    pub data3: u16,
    pub data4: [u8; 8],
}

impl From<&uuid::Uuid> for GUID {
    fn from(id: &uuid::Uuid) -> Self {
        let (data1, data2, data3, data4) = id.as_fields();
        Self {
            data1,
            data2,
            data3,
            data4: *data4,
        }
    }
}

#[link(name = "computenetwork")]
unsafe extern "system" {
    pub fn HcnOpenNetwork(
        id: *const GUID,
        network: *mut HCN_NETWORK,
        error_record: *mut PWSTR,
    ) -> HRESULT;

    pub fn HcnCloseNetwork(network: HCN_NETWORK) -> HRESULT;

    pub fn HcnDeleteNetwork(id: *const GUID, error_record: *mut PWSTR) -> HRESULT;

    pub fn HcnCreateNetwork(
        id: *const GUID,
        settings: PCWSTR,
        network: *mut HCN_NETWORK,
        error_record: *mut PWSTR,
    ) -> HRESULT;
}

#[link(name = "ole32")]
unsafe extern "system" {
    pub fn CoTaskMemFree(pv: *const c_void);
}
