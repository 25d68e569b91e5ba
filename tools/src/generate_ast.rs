use anyhow::{bail, Context, Result};
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

/// One node variant, parsed from a line like `Unary : Token operator, Expr right`.
#[derive(Debug, PartialEq)]
struct NodeType {
    name: String,
    // (type, field name)
    fields: Vec<(String, String)>,
}

fn parse_node(base_name: &str, description: &str) -> Result<NodeType> {
    let (name, fields) = description
        .split_once(':')
        .with_context(|| format!("missing ':' in node description {description:?}"))?;
    let name = name.trim();
    if name.is_empty() || name == base_name {
        bail!("bad node name in {description:?}");
    }

    let fields = fields
        .split(',')
        .map(|field| match field.split_whitespace().collect::<Vec<_>>()[..] {
            [ty, field_name] => Ok((ty.to_owned(), field_name.to_owned())),
            _ => bail!("expected `Type name` but found {field:?} in {description:?}"),
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(NodeType {
        name: name.to_owned(),
        fields,
    })
}

fn to_snake_case(name: &str) -> String {
    let mut snake = String::new();
    for (i, c) in name.chars().enumerate() {
        if c.is_uppercase() && i > 0 {
            snake.push('_');
        }
        snake.extend(c.to_lowercase());
    }
    snake
}

/// Children of the base type are boxed so the enum has a known size.
fn field_type(base_name: &str, ty: &str) -> String {
    if ty == base_name {
        format!("Box<{base_name}>")
    } else {
        ty.to_owned()
    }
}

fn define_type(src: &mut String, base_name: &str, node: &NodeType) -> std::fmt::Result {
    writeln!(src, "#[derive(Debug, Clone, PartialEq)]")?;
    let params: Vec<String> = node
        .fields
        .iter()
        .map(|(ty, name)| format!("{name}: {ty}"))
        .collect();

    // single-field nodes are newtypes
    if let [(ty, name)] = &node.fields[..] {
        writeln!(src, "pub struct {}(pub {});\n", node.name, field_type(base_name, ty))?;
        writeln!(src, "impl {} {{", node.name)?;
        writeln!(src, "    pub fn new({}) -> Self {{", params.join(", "))?;
        if ty == base_name {
            writeln!(src, "        {}(Box::new({name}))", node.name)?;
        } else {
            writeln!(src, "        {}({name})", node.name)?;
        }
        writeln!(src, "    }}")?;
        return writeln!(src, "}}\n");
    }

    writeln!(src, "pub struct {} {{", node.name)?;
    for (ty, name) in &node.fields {
        writeln!(src, "    pub {}: {},", name, field_type(base_name, ty))?;
    }
    writeln!(src, "}}\n")?;

    writeln!(src, "impl {} {{", node.name)?;
    writeln!(src, "    pub fn new({}) -> Self {{", params.join(", "))?;
    writeln!(src, "        {} {{", node.name)?;
    for (ty, name) in &node.fields {
        if ty == base_name {
            writeln!(src, "            {name}: Box::new({name}),")?;
        } else {
            writeln!(src, "            {name},")?;
        }
    }
    writeln!(src, "        }}")?;
    writeln!(src, "    }}")?;
    writeln!(src, "}}\n")
}

fn define_visitor(src: &mut String, base_name: &str, nodes: &[NodeType]) -> std::fmt::Result {
    writeln!(src, "pub trait {base_name}Visitor<T> {{")?;
    for node in nodes {
        let arg = to_snake_case(&node.name);
        writeln!(
            src,
            "    fn visit_{arg}(&mut self, {arg}: &{}) -> T;",
            node.name
        )?;
    }
    writeln!(src, "}}\n")?;

    writeln!(src, "impl {base_name} {{")?;
    writeln!(src, "    pub fn accept<T, V>(&self, visitor: &mut V) -> T")?;
    writeln!(src, "    where")?;
    writeln!(src, "        V: {base_name}Visitor<T> + ?Sized,")?;
    writeln!(src, "    {{")?;
    writeln!(src, "        match self {{")?;
    for node in nodes {
        let arg = to_snake_case(&node.name);
        writeln!(
            src,
            "            {base_name}::{}({arg}) => visitor.visit_{arg}({arg}),",
            node.name
        )?;
    }
    writeln!(src, "        }}")?;
    writeln!(src, "    }}")?;
    writeln!(src, "}}")
}

/// Render the module source for `base_name` and its node `types`.
pub fn render_ast(base_name: &str, types: &[&str]) -> Result<String> {
    let nodes = types
        .iter()
        .map(|description| parse_node(base_name, description))
        .collect::<Result<Vec<_>>>()?;
    if nodes.is_empty() {
        bail!("{base_name} needs at least one node type");
    }

    let mut src = String::new();
    writeln!(src, "// Generated by generate_ast, do not edit.\n")?;
    writeln!(src, "use crate::lox::scanner::tokens::{{Token, Value}};\n")?;

    writeln!(src, "#[derive(Debug, Clone, PartialEq)]")?;
    writeln!(src, "pub enum {base_name} {{")?;
    for node in &nodes {
        writeln!(src, "    {0}({0}),", node.name)?;
    }
    writeln!(src, "}}\n")?;

    for node in &nodes {
        define_type(&mut src, base_name, node)?;
    }
    define_visitor(&mut src, base_name, &nodes)?;

    Ok(src)
}

/// Write `<base_name lowercased>.rs` into `output_dir`, returning the path written.
pub fn define_ast(output_dir: &Path, base_name: &str, types: &[&str]) -> Result<PathBuf> {
    let src = render_ast(base_name, types)?;
    let path = output_dir.join(base_name.to_lowercase() + ".rs");
    fs::write(&path, src).with_context(|| format!("could not write {}", path.display()))?;
    Ok(path)
}
