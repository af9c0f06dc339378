use mat5_reader::{MatArray, MatFile, ReadOptions, StructMode};
use std::env;

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <path-to-mat-file> [--struct-as-map] [--squeeze]", args[0]);
        std::process::exit(1);
    }

    let mat_path = &args[1];
    let mut options = ReadOptions::new();
    for flag in &args[2..] {
        match flag.as_str() {
            "--struct-as-map" => options = options.struct_mode(StructMode::Map),
            "--squeeze" => options = options.squeeze_me(true),
            other => {
                eprintln!("ERROR: Unknown option '{}'", other);
                std::process::exit(1);
            }
        }
    }

    println!("Reading MAT file: {}", mat_path);
    println!("{}", "=".repeat(60));

    let mut file = match MatFile::open(mat_path, options) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("\nERROR: Failed to open MAT file");
            eprintln!("  {}", e);
            std::process::exit(1);
        }
    };

    println!("\nFile Information:");
    println!("  Description: {}", file.header().description);
    println!("  Version: {:#06x}", file.header().version);
    println!("  Byte order: {}", file.header().endian);

    let variables = match file.iter_variables() {
        Ok(iter) => iter,
        Err(e) => {
            eprintln!("\nERROR: Failed to seek to variables");
            eprintln!("  {}", e);
            std::process::exit(1);
        }
    };

    println!("\nVariables:");
    let (mut read, mut failed) = (0, 0);
    for variable in variables {
        match variable {
            Ok(v) => {
                read += 1;
                println!("  {:<20} {:<16} {:?}", v.name, v.array.kind(), v.array.shape());
                if let Some(preview) = preview(&v.array) {
                    println!("  {:<20} {}", "", preview);
                }
            }
            Err(e) => {
                failed += 1;
                println!("  <skipped> {}", e);
            }
        }
    }

    println!("\n{}", "=".repeat(60));
    println!("Read {} variables ({} skipped)", read, failed);
}

/// A one-line preview of small char and struct arrays.
fn preview(array: &MatArray) -> Option<String> {
    match array {
        MatArray::Char(chars) => {
            let text = chars.to_text();
            (text.chars().count() <= 60).then(|| format!("'{}'", text))
        }
        MatArray::Struct(s) => Some(format!("fields: {}", s.field_names.join(", "))),
        MatArray::Object(o) => Some(format!("fields: {}", o.fields.field_names.join(", "))),
        _ => None,
    }
}
