use std::io::{self, Write};

/// Writes `message` to stdout and, when given, to `writer` as well.
///
/// The extra writer lets tests capture command output.
pub fn println(message: &str, writer: &mut Option<&mut dyn Write>) -> io::Result<()> {
    if let Err(e) = writeln!(io::stdout(), "{message}") {
        tracing::warn!(error = %e, "failed to write to stdout");
    }

    if let Some(w) = writer {
        writeln!(w, "{message}")?;
    }

    Ok(())
}

pub fn println_all<I, S>(lines: I, writer: &mut Option<&mut dyn Write>) -> io::Result<()>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    lines
        .into_iter()
        .try_for_each(|line| println(line.as_ref(), writer))
}
