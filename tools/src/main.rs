use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use generate_ast::define_ast;
mod generate_ast;

#[derive(Parser, Debug)]
#[command(about = "Write the expression node definitions and their visitor trait")]
struct Args {
    /// Directory the generated module is written into
    output_dir: PathBuf,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let path = define_ast(
        &args.output_dir,
        "Expr",
        &[
            "Binary   : Expr left, Token operator, Expr right",
            "Grouping : Expr expression",
            "Literal  : Value value",
            "Unary    : Token operator, Expr right",
        ],
    )?;
    println!("wrote {}", path.display());
    Ok(())
}
