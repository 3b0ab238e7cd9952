//! Process snapshot lookup

use std::ffi::OsStr;
use sysinfo::System;

/// Find the PID of a running process by exact image name
pub fn find_by_name(name: &str) -> Option<u32> {
    let sys = System::new_all();

    sys.processes()
        .iter()
        .find(|(_, process)| process.name() == OsStr::new(name))
        .map(|(pid, _)| pid.as_u32())
}
