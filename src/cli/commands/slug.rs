//! Slug helper command.

use crate::cli::icons::warn;
use ghlink::slug::Slug;

/// Print the sanitized form of `input`, or a random slug.
pub fn cmd_slug(input: Option<&str>) -> anyhow::Result<()> {
    let Some(input) = input else {
        println!("{}", Slug::random());
        return Ok(());
    };

    let slug = Slug::parse(input)?;
    if slug.as_str() != input.trim() {
        eprintln!("{} Unsupported characters removed", warn());
    }
    println!("{}", slug);
    Ok(())
}
