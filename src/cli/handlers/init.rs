use std::path::Path;

use crate::cli::commands::InitArgs;
use crate::io::table_io;

const TABLE_TOML_TEMPLATE: &str = r##"[table]
name = "{name}"
# Payload columns shown by `gt show`, in order. Leave empty to show all.
columns = ["name", "qty"]

# --- Order keys ---
# Rows are sorted by `order`. Moves only rewrite the keys of what moved, by
# splitting the gap between neighbors. After many moves into the same spot
# the gaps get tiny; `gt check` warns below `min_gap`, and `gt normalize`
# spaces every key `normalize_step` apart again.
[order]
min_gap = 1e-9
normalize_step = 1.0

# --- Rows ---
# `group` clusters rows; the first row of each group carries `span`, the
# number of rows its group cell covers. Any other key is display payload
# and may hold any TOML value.

[[rows]]
id = "r1"
group = "fruit"
order = 1.0
span = 3
name = "Apple"
qty = 3

[[rows]]
id = "r2"
group = "fruit"
order = 2.0
name = "Pear"
qty = 1

[[rows]]
id = "r3"
group = "fruit"
order = 3.0
name = "Plum"
qty = 6

[[rows]]
id = "r4"
group = "dairy"
order = 4.0
span = 2
name = "Milk"
qty = 2

[[rows]]
id = "r5"
group = "dairy"
order = 5.0
name = "Cheese"
qty = 1

[[rows]]
id = "r6"
group = "bakery"
order = 6.0
span = 1
name = "Bread"
qty = 1
"##;

/// Infer a table name from a directory name: replace hyphens with spaces, title-case.
fn infer_name(dir_name: &str) -> String {
    dir_name
        .split(['-', '_'])
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                None => String::new(),
                Some(c) => {
                    let upper: String = c.to_uppercase().collect();
                    upper + chars.as_str()
                }
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Render the starter table for `name`
pub fn starter_table(name: &str) -> String {
    let escaped = name.replace('\\', "\\\\").replace('"', "\\\"");
    TABLE_TOML_TEMPLATE.replace("{name}", &escaped)
}

pub fn cmd_init(args: InitArgs, dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let name = match args.name {
        Some(name) => name,
        None => {
            let dir_name = dir
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("table");
            infer_name(dir_name)
        }
    };

    let path = table_io::write_new_table(dir, &starter_table(&name), args.force)?;
    println!("created {}", path.display());
    Ok(())
}
