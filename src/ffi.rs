#![allow(dead_code)]
#![allow(non_camel_case_types)]

use std::mem::size_of;

pub type cpu_type_t = i32;
pub type cpu_subtype_t = i32;
pub type vm_prot_t = i32;

#[repr(C)]
pub struct mach_header_64 {
    pub magic: u32,
    pub cputype: cpu_type_t,
    pub cpusubtype: cpu_subtype_t,
    pub filetype: u32,
    pub ncmds: u32,
    pub sizeofcmds: u32,
    pub flags: u32,
    pub reserved: u32,
}

#[repr(C)]
pub struct segment_command_64 {
    pub cmd: u32,
    pub cmdsize: u32,
    pub segname: [u8; 16],
    pub vmaddr: u64,
    pub vmsize: u64,
    pub fileoff: u64,
    pub filesize: u64,
    pub maxprot: vm_prot_t,
    pub initprot: vm_prot_t,
    pub nsects: u32,
    pub flags: u32,
}

#[repr(C)]
pub struct section_64 {
    pub sectname: [u8; 16],
    pub segname: [u8; 16],
    pub addr: u64,
    pub size: u64,
    pub offset: u32,
    /// power of 2
    pub align: u32,
    pub reloff: u32,
    pub nreloc: u32,
    pub flags: u32,
    pub reserved1: u32,
    pub reserved2: u32,
    pub reserved3: u32,
}

/// 32-bit header, identical to `mach_header_64` minus the trailing `reserved`.
#[repr(C)]
pub struct mach_header {
    pub magic: u32,
    pub cputype: cpu_type_t,
    pub cpusubtype: cpu_subtype_t,
    pub filetype: u32,
    pub ncmds: u32,
    pub sizeofcmds: u32,
    pub flags: u32,
}

#[repr(C)]
pub struct segment_command {
    pub cmd: u32,
    pub cmdsize: u32,
    pub segname: [u8; 16],
    pub vmaddr: u32,
    pub vmsize: u32,
    pub fileoff: u32,
    pub filesize: u32,
    pub maxprot: vm_prot_t,
    pub initprot: vm_prot_t,
    pub nsects: u32,
    pub flags: u32,
}

#[repr(C)]
pub struct section {
    pub sectname: [u8; 16],
    pub segname: [u8; 16],
    pub addr: u32,
    pub size: u32,
    pub offset: u32,
    pub align: u32,
    pub reloff: u32,
    pub nreloc: u32,
    pub flags: u32,
    pub reserved1: u32,
    pub reserved2: u32,
}

/// Common prefix of every load command.
#[repr(C)]
pub struct load_command {
    pub cmd: u32,
    pub cmdsize: u32,
}

#[repr(C)]
pub struct dylib_command {
    pub cmd: u32,
    pub cmdsize: u32,
    /// offset of the path string from the start of the command
    pub name: u32,
    pub timestamp: u32,
    pub current_version: u32,
    pub compatibility_version: u32,
}

/// Fat headers are always stored big-endian on disk.
#[repr(C)]
pub struct fat_header {
    pub magic: u32,
    pub nfat_arch: u32,
}

#[repr(C)]
pub struct fat_arch {
    pub cputype: cpu_type_t,
    pub cpusubtype: cpu_subtype_t,
    pub offset: u32,
    pub size: u32,
    pub align: u32,
}

// Sizes fixed by the Mach-O format; any drift must fail the build.
const _: () = assert!(size_of::<mach_header_64>() == 32);
const _: () = assert!(size_of::<segment_command_64>() == 72);
const _: () = assert!(size_of::<section_64>() == 80);
