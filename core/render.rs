use crate::error::{AppError, Result};
use crate::filter::file_extension;
use crate::options::AppOptions;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

static LANGUAGE_BY_EXTENSION: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        // Web
        (".html", "html"),
        (".htm", "html"),
        (".css", "css"),
        (".scss", "scss"),
        (".sass", "sass"),
        (".less", "less"),
        (".js", "javascript"),
        (".jsx", "javascript"),
        (".mjs", "javascript"),
        (".ts", "typescript"),
        (".tsx", "typescript"),
        (".vue", "vue"),
        (".json", "json"),
        (".xml", "xml"),
        (".svg", "xml"),
        // Systems and application languages
        (".cs", "csharp"),
        (".csproj", "xml"),
        (".rs", "rust"),
        (".c", "c"),
        (".h", "c"),
        (".cpp", "cpp"),
        (".cc", "cpp"),
        (".hpp", "cpp"),
        (".go", "go"),
        (".java", "java"),
        (".kt", "kotlin"),
        (".swift", "swift"),
        (".sql", "sql"),
        // Scripting
        (".py", "python"),
        (".rb", "ruby"),
        (".php", "php"),
        (".lua", "lua"),
        (".sh", "shell"),
        (".bash", "shell"),
        (".bat", "batch"),
        (".cmd", "batch"),
        (".ps1", "powershell"),
        // Data and docs
        (".yaml", "yaml"),
        (".yml", "yaml"),
        (".toml", "toml"),
        (".ini", "ini"),
        (".md", "markdown"),
        (".txt", "text"),
    ])
});

/// Fence language tag for `extension` (with leading dot). Unknown extensions map to `""`.
pub fn language_for(extension: &str) -> &'static str {
    LANGUAGE_BY_EXTENSION
        .get(extension.to_lowercase().as_str())
        .copied()
        .unwrap_or("")
}

/// Writes one Markdown section per file into `out`.
///
/// Headers show each path relative to `display_root`.
pub struct MarkdownWriter<W: Write> {
    out: W,
    display_root: PathBuf,
}

impl<W: Write> MarkdownWriter<W> {
    pub fn new(out: W, display_root: impl Into<PathBuf>) -> Self {
        Self {
            out,
            display_root: display_root.into(),
        }
    }

    pub fn display_path(&self, file_path: &Path) -> PathBuf {
        pathdiff::diff_paths(file_path, &self.display_root)
            .unwrap_or_else(|| file_path.to_path_buf())
    }

    /// Renders `file_path` as a section. Any failure is an [`AppError::EntryWrite`].
    pub fn write_entry(&mut self, file_path: &Path, options: &AppOptions) -> Result<()> {
        self.render(file_path, options)
            .map_err(|source| AppError::EntryWrite {
                path: file_path.to_path_buf(),
                source,
            })
    }

    fn render(&mut self, file_path: &Path, options: &AppOptions) -> io::Result<()> {
        let extension = file_extension(file_path);
        let display = self.display_path(file_path);

        if options.is_path_only(&extension) {
            let file_name = file_path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            write_header(&mut self.out, &display)?;
            writeln!(
                self.out,
                "<!-- Content of binary file '{}' not included. -->",
                file_name
            )?;
            return write_separator(&mut self.out);
        }

        // Open before emitting anything so an unreadable file leaves no header behind.
        let mut reader = BufReader::new(File::open(file_path)?);

        write_header(&mut self.out, &display)?;
        writeln!(self.out, "```{}", language_for(&extension))?;
        copy_lines(&mut reader, &mut self.out)?;
        writeln!(self.out, "```")?;
        write_separator(&mut self.out)
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

fn write_header<W: Write>(out: &mut W, display: &Path) -> io::Result<()> {
    writeln!(out, "### `{}`", display.display())?;
    writeln!(out)
}

fn write_separator<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "---")?;
    writeln!(out)
}

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Copies `reader` line by line. Lines end at `\n`, `\r\n` or a lone `\r`;
/// a leading UTF-8 BOM is dropped and invalid UTF-8 becomes U+FFFD.
fn copy_lines<R: BufRead, W: Write>(reader: &mut R, out: &mut W) -> io::Result<()> {
    let mut chunk = Vec::new();
    let mut first = true;
    loop {
        chunk.clear();
        if reader.read_until(b'\n', &mut chunk)? == 0 {
            return Ok(());
        }

        let mut bytes = chunk.as_slice();
        if first {
            bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
            first = false;
        }
        bytes = bytes.strip_suffix(b"\n").unwrap_or(bytes);
        bytes = bytes.strip_suffix(b"\r").unwrap_or(bytes);

        for line in bytes.split(|b| *b == b'\r') {
            out.write_all(String::from_utf8_lossy(line).as_bytes())?;
            out.write_all(b"\n")?;
        }
    }
}
