//! Line-oriented console output.

use std::fmt::Display;
use std::io::{self, Stdout, Write};

use colored::{Color, Colorize};

/// Writes human-readable status lines, optionally colored.
pub struct Console<W> {
    out: W,
    color: bool,
}

impl Console<Stdout> {
    /// Console over standard output.
    pub fn stdout(color: bool) -> Self {
        Self::new(io::stdout(), color)
    }
}

impl<W: Write> Console<W> {
    /// Wraps `out`. Colors are emitted only when `color` is set.
    pub fn new(out: W, color: bool) -> Self {
        Self { out, color }
    }

    /// Consumes the console, returning the writer.
    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Section heading or success message (green).
    pub fn info(&mut self, message: impl Display) -> io::Result<()> {
        self.write_colored(message, Color::Green)
    }

    /// Plain detail line.
    pub fn line(&mut self, message: impl Display) -> io::Result<()> {
        writeln!(self.out, "{message}")
    }

    /// Non-fatal problem (yellow).
    pub fn warn(&mut self, message: impl Display) -> io::Result<()> {
        self.write_colored(message, Color::Yellow)
    }

    /// Failure line (red).
    pub fn error(&mut self, message: impl Display) -> io::Result<()> {
        self.write_colored(message, Color::Red)
    }

    /// Empty line.
    pub fn new_line(&mut self) -> io::Result<()> {
        writeln!(self.out)
    }

    /// Renders a bordered table with one header row.
    pub fn table<const N: usize>(
        &mut self,
        headers: [&str; N],
        rows: &[[String; N]],
    ) -> io::Result<()> {
        let mut widths = headers.map(|h| h.chars().count());
        for row in rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let border = widths
            .iter()
            .map(|w| "-".repeat(w + 2))
            .collect::<Vec<_>>()
            .join("+");
        let border = format!("+{border}+");

        writeln!(self.out, "{border}")?;
        self.table_row(&headers, &widths)?;
        writeln!(self.out, "{border}")?;
        for row in rows {
            self.table_row(row, &widths)?;
        }
        writeln!(self.out, "{border}")
    }

    fn table_row<S: AsRef<str>>(&mut self, cells: &[S], widths: &[usize]) -> io::Result<()> {
        let cells = cells
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!(" {:<width$} ", cell.as_ref()))
            .collect::<Vec<_>>()
            .join("|");
        writeln!(self.out, "|{cells}|")
    }

    fn write_colored(&mut self, message: impl Display, color: Color) -> io::Result<()> {
        let message = message.to_string();
        if self.color {
            writeln!(self.out, "{}", message.color(color))
        } else {
            writeln!(self.out, "{message}")
        }
    }
}
