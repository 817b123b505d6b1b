use crate::ffi::{
    dylib_command, fat_arch, fat_header, load_command, mach_header, mach_header_64, section,
    section_64, segment_command, segment_command_64,
};
use anyhow::{bail, Context, Result};
use crossterm::style::Stylize;
use std::io::Write;
use std::mem::{align_of, size_of};

/// Name and in-memory layout of one Mach-O record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StructureDescriptor {
    pub name: &'static str,
    pub size: usize,
    pub align: usize,
}

macro_rules! descriptor {
    ($type:ident) => {
        StructureDescriptor {
            name: stringify!($type),
            size: size_of::<$type>(),
            align: align_of::<$type>(),
        }
    };
}

pub const CORE: [StructureDescriptor; 3] = [
    descriptor!(mach_header_64),
    descriptor!(segment_command_64),
    descriptor!(section_64),
];

pub const EXTENDED: [StructureDescriptor; 10] = [
    descriptor!(mach_header_64),
    descriptor!(segment_command_64),
    descriptor!(section_64),
    descriptor!(mach_header),
    descriptor!(segment_command),
    descriptor!(section),
    descriptor!(load_command),
    descriptor!(dylib_command),
    descriptor!(fat_header),
    descriptor!(fat_arch),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum StructureSet {
    /// 64-bit header, segment command and section
    #[default]
    Core,
    /// core records plus 32-bit, load/dylib command and fat records
    Extended,
}

impl StructureSet {
    pub fn descriptors(self) -> &'static [StructureDescriptor] {
        match self {
            StructureSet::Core => &CORE,
            StructureSet::Extended => &EXTENDED,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ReportOptions {
    pub show_align: bool,
    pub color: bool,
}

pub fn find(name: &str) -> Option<&'static StructureDescriptor> {
    EXTENDED.iter().find(|d| d.name == name)
}

/// Keeps the entries of `descriptors` named in `names`, in declaration order.
pub fn select(
    descriptors: &[StructureDescriptor],
    names: &[String],
) -> Result<Vec<StructureDescriptor>> {
    if names.is_empty() {
        return Ok(descriptors.to_vec());
    }

    for name in names {
        if !descriptors.iter().any(|d| d.name == *name) {
            let known = descriptors
                .iter()
                .map(|d| d.name)
                .collect::<Vec<_>>()
                .join(", ");
            if find(name).is_some() {
                bail!("`{}` is only reported with `--set extended`", name);
            }
            bail!("unknown structure `{}`, expected one of: {}", name, known);
        }
    }

    Ok(descriptors
        .iter()
        .filter(|d| names.iter().any(|n| n == d.name))
        .copied()
        .collect())
}

pub fn descriptor_line(descriptor: &StructureDescriptor, show_align: bool) -> String {
    if show_align {
        format!(
            "Sizeof {}: {} (align {})",
            descriptor.name, descriptor.size, descriptor.align
        )
    } else {
        format!("Sizeof {}: {}", descriptor.name, descriptor.size)
    }
}

fn styled_line(descriptor: &StructureDescriptor, show_align: bool) -> String {
    let mut line = format!(
        "Sizeof {}: {}",
        descriptor.name.cyan(),
        descriptor.size.to_string().bold()
    );
    if show_align {
        line.push_str(&format!(" (align {})", descriptor.align));
    }
    line
}

pub fn report<W: Write>(
    out: &mut W,
    descriptors: &[StructureDescriptor],
    options: ReportOptions,
) -> Result<()> {
    for descriptor in descriptors {
        log::debug!(
            "{}: size {:#x}, align {}",
            descriptor.name,
            descriptor.size,
            descriptor.align
        );
        let line = if options.color {
            styled_line(descriptor, options.show_align)
        } else {
            descriptor_line(descriptor, options.show_align)
        };
        writeln!(out, "{}", line)
            .with_context(|| format!("failed to write size of `{}`", descriptor.name))?;
    }
    out.flush().context("failed to flush report")?;
    Ok(())
}
