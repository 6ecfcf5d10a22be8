//! # Shapes Subcommand
//!
//! Lists the bundled record shapes with each record's field metadata.

use std::fmt::Write as _;

use anyhow::Result;
use clap::Args;
use tagload_core::RecordDescriptor;

use crate::shapes::Shape;

/// Arguments for the `tagload shapes` subcommand.
#[derive(Args, Debug)]
pub struct ShapesArgs {
    /// Describe a single shape instead of all of them.
    #[arg(value_enum)]
    pub shape: Option<Shape>,
}

/// Render one record descriptor as an indented field table.
pub fn render_descriptor(descriptor: &RecordDescriptor) -> String {
    let mut out = format!("  {}\n", descriptor.name);
    for field in descriptor.fields {
        let mut line = format!("    {:<16} {:<24}", field.wire, field.kind.to_string());
        if field.required {
            line.push_str(" required");
        }
        if let Some(literal) = field.default {
            let _ = write!(line, " default={literal:?}");
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

/// Execute the shapes subcommand.
pub fn run_shapes(args: &ShapesArgs) -> Result<u8> {
    let shapes = match args.shape {
        Some(shape) => vec![shape],
        None => Shape::all().to_vec(),
    };
    for shape in shapes {
        println!("{shape}:");
        for descriptor in shape.descriptors() {
            print!("{}", render_descriptor(descriptor));
        }
    }
    Ok(0)
}
