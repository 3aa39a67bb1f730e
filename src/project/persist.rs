//! Persisting migrated files.
//!
//! Rewrites each file on disk with its namespace declaration and import
//! block injected after the opening tag. Templates have no namespace of
//! their own; they only receive imports, and only when there are any.

use std::path::Path;

use regex::Regex;
use tracing::trace;

use super::error::MigrationResult;
use super::file_io::write_latin1;
use super::source_file::SourceFile;

/// Write every file back under `base` with its header rewritten.
pub fn persist_files(base: &Path, files: &[SourceFile]) -> MigrationResult<()> {
    // `<?php` or the short `<?` tag, whichever comes first
    let open_tag = Regex::new(r"(<\?php|<\?)").expect("static pattern");
    for file in files {
        let contents = render(file, &open_tag);
        trace!(path = %file.path.display(), imports = file.import_set.len(), "persisting");
        write_latin1(&base.join(&file.path), &contents)?;
    }
    Ok(())
}

fn render(file: &SourceFile, open_tag: &Regex) -> String {
    let uses = file
        .import_set
        .iter()
        .map(|name| format!("use {name};"))
        .collect::<Vec<_>>()
        .join("\n");

    if !file.is_template() {
        let header = format!("<?php\n\nnamespace {};\n\n{uses}\n", file.namespace);
        return open_tag
            .replacen(&file.contents, 1, header.as_str())
            .into_owned();
    }

    // Template with nothing to import stays untouched.
    if file.import_set.is_empty() {
        return file.contents.clone();
    }

    let first_line = file.contents.lines().next().unwrap_or("");
    if open_tag.is_match(first_line) {
        let header = format!("<?php\n\n{uses}\n");
        return open_tag
            .replacen(&file.contents, 1, header.as_str())
            .into_owned();
    }

    // Markup-first template: open a dedicated tag block at the top.
    format!("<?php\n\n{uses}\n\n?>\n\n{}", file.contents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn open_tag() -> Regex {
        Regex::new(r"(<\?php|<\?)").unwrap()
    }

    fn file(path: &str, contents: &str, imports: &[&str]) -> SourceFile {
        let mut f = SourceFile::new(PathBuf::from(path), contents.to_string());
        f.namespace = "App\\Core".to_string();
        f.import_set = imports.iter().map(|s| s.to_string()).collect();
        f
    }

    #[test]
    fn test_php_file_gets_namespace_and_uses() {
        let f = file(
            "Core/Service.php",
            "<?php\nclass Service {}",
            &["App\\Http\\Request", "Exception"],
        );
        let out = render(&f, &open_tag());
        assert!(out.starts_with(
            "<?php\n\nnamespace App\\Core;\n\nuse App\\Http\\Request;\nuse Exception;\n"
        ));
        assert!(out.contains("class Service {}"));
    }

    #[test]
    fn test_short_open_tag_is_normalized() {
        let f = file("Core/Legacy.php", "<?\nclass Legacy {}", &[]);
        let out = render(&f, &open_tag());
        assert!(out.starts_with("<?php\n\nnamespace App\\Core;"));
        assert!(!out.contains("<?\n"));
    }

    #[test]
    fn test_template_without_imports_is_untouched() {
        let f = file("Views/List.phtml", "<ul><li>item</li></ul>", &[]);
        assert_eq!(render(&f, &open_tag()), "<ul><li>item</li></ul>");
    }

    #[test]
    fn test_template_with_markup_first_gets_tag_block() {
        let f = file(
            "Views/List.phtml",
            "<ul>\n    <li><?php echo $x; ?></li>\n</ul>",
            &["App\\Core\\Helper"],
        );
        let out = render(&f, &open_tag());
        assert!(out.starts_with("<?php\n\nuse App\\Core\\Helper;\n\n?>\n\n<ul>"));
    }

    #[test]
    fn test_template_with_tag_on_first_line_gets_uses_inline() {
        let f = file(
            "Views/Row.phtml",
            "<tr><?php echo $cell; ?></tr>",
            &["App\\Core\\Helper"],
        );
        let out = render(&f, &open_tag());
        assert!(out.starts_with("<tr><?php\n\nuse App\\Core\\Helper;\n"));
    }

    #[test]
    fn test_template_opening_with_php_gets_uses_inline() {
        let f = file(
            "Views/Header.phtml",
            "<?php echo $title; ?>",
            &["App\\Core\\Helper"],
        );
        let out = render(&f, &open_tag());
        assert!(out.starts_with("<?php\n\nuse App\\Core\\Helper;\n echo $title; ?>"));
    }
}
