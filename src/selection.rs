/*!
 * Interactive file selection
 *
 * The menu is modelled as a state machine driven by text commands, so the
 * terminal front end only has to feed it lines and print what comes back.
 */

use std::fmt::Write as _;
use std::str::FromStr;

use crate::types::RelativePath;

/// Files shown per page
pub const PAGE_SIZE: usize = 20;

/// Help text listing the available commands
pub const HELP: &str = "\
Commands:
  [a]ll       - Select all files
  [n]one      - Deselect all files
  [t]oggle N  - Toggle selection for file #N
  [r]ange N-M - Toggle selection for files #N through #M
  [p]age N    - Show page N
  [s]how      - Show current selection
  [d]one      - Finish selection and proceed
  [q]uit      - Cancel and exit";

/// A parsed menu command. Indices and pages are 1-based as typed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    All,
    None,
    Toggle(usize),
    Range(usize, usize),
    Page(usize),
    Show,
    Done,
    Quit,
}

impl FromStr for Command {
    /// Usage message for malformed input
    type Err = String;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let lowered = input.trim().to_lowercase();
        let mut parts = lowered.split_whitespace();
        let verb = parts.next().unwrap_or("");
        let args: Vec<&str> = parts.collect();

        let number = |usage: &str| -> Result<usize, String> {
            match args.as_slice() {
                [n] => n.parse().map_err(|_| format!("Invalid number. Usage: {usage}")),
                _ => Err(format!("Usage: {usage}")),
            }
        };

        match verb {
            "a" | "all" => Ok(Self::All),
            "n" | "none" => Ok(Self::None),
            "s" | "show" => Ok(Self::Show),
            "d" | "done" => Ok(Self::Done),
            "q" | "quit" => Ok(Self::Quit),
            "t" | "toggle" => number("toggle <number>").map(Self::Toggle),
            "p" | "page" => number("page <number>").map(Self::Page),
            "r" | "range" => {
                let usage = "range <start>-<end> (e.g., range 1-10)";
                let [range] = args.as_slice() else {
                    return Err(format!("Usage: {usage}"));
                };
                let Some((start, end)) = range.split_once('-') else {
                    return Err(format!("Usage: {usage}"));
                };
                match (start.parse(), end.parse()) {
                    (Ok(start), Ok(end)) => Ok(Self::Range(start, end)),
                    _ => Err(format!("Invalid range. Usage: {usage}")),
                }
            }
            _ => Err(
                "Unknown command. Available commands: all, none, toggle N, range N-M, page N, show, done, quit"
                    .to_string(),
            ),
        }
    }
}

/// Result of applying one command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Keep reading commands; the text is shown to the user
    Continue(String),
    /// Selection confirmed
    Finished(Vec<RelativePath>),
    /// User quit
    Cancelled,
}

/// Final outcome of a selection session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionOutcome {
    Selected(Vec<RelativePath>),
    Cancelled,
}

/// Selection state over a fixed list of files. Everything starts selected.
#[derive(Debug, Clone)]
pub struct Selection<'a> {
    files: &'a [RelativePath],
    selected: Vec<bool>,
    page_start: usize,
}

impl<'a> Selection<'a> {
    pub fn new(files: &'a [RelativePath]) -> Self {
        Self {
            files,
            selected: vec![true; files.len()],
            page_start: 0,
        }
    }

    pub fn selected_count(&self) -> usize {
        self.selected.iter().filter(|s| **s).count()
    }

    /// Currently selected files in list order
    pub fn selected_files(&self) -> Vec<RelativePath> {
        self.files
            .iter()
            .zip(&self.selected)
            .filter(|(_, selected)| **selected)
            .map(|(file, _)| file.clone())
            .collect()
    }

    /// Parse and apply a raw input line
    pub fn apply_line(&mut self, line: &str) -> Step {
        if line.trim().is_empty() {
            return Step::Continue(String::new());
        }
        match line.parse::<Command>() {
            Ok(command) => self.apply(command),
            Err(usage) => Step::Continue(usage),
        }
    }

    pub fn apply(&mut self, command: Command) -> Step {
        let total = self.files.len();
        match command {
            Command::Done => {
                let files = self.selected_files();
                if files.is_empty() {
                    Step::Continue("No files selected. Please select at least one file.".to_string())
                } else {
                    Step::Finished(files)
                }
            }
            Command::Quit => Step::Cancelled,
            Command::All => {
                self.selected.fill(true);
                Step::Continue(format!("All {total} files selected.\n{}", self.render_page()))
            }
            Command::None => {
                self.selected.fill(false);
                Step::Continue(format!("All files deselected.\n{}", self.render_page()))
            }
            Command::Show => Step::Continue(self.render_page()),
            Command::Toggle(n) => {
                if n == 0 || n > total {
                    return Step::Continue(format!("Invalid index. Please use 1-{total}"));
                }
                let index = n - 1;
                self.selected[index] = !self.selected[index];
                let status = if self.selected[index] { "selected" } else { "deselected" };
                let mut message = format!("File #{n} {status}: {}", self.files[index]);
                if (self.page_start..self.page_start + PAGE_SIZE).contains(&index) {
                    message.push('\n');
                    message.push_str(&self.render_page());
                }
                Step::Continue(message)
            }
            Command::Range(start, end) => {
                if start == 0 || start > end || end > total {
                    return Step::Continue(format!("Invalid range. Please use 1-{total}"));
                }
                for flag in &mut self.selected[start - 1..end] {
                    *flag = !*flag;
                }
                Step::Continue(format!("Toggled files #{start}-{end}\n{}", self.render_page()))
            }
            Command::Page(page) => {
                let start = page.saturating_sub(1) * PAGE_SIZE;
                if page == 0 || start >= total {
                    let max_page = total.saturating_sub(1) / PAGE_SIZE + 1;
                    return Step::Continue(format!("Invalid page. Please use 1-{max_page}"));
                }
                self.page_start = start;
                Step::Continue(self.render_page())
            }
        }
    }

    /// Render the current page with selection markers
    pub fn render_page(&self) -> String {
        let total = self.files.len();
        let end = (self.page_start + PAGE_SIZE).min(total);
        let mut out = String::new();

        let _ = writeln!(out, "Files {}-{} of {}:", self.page_start + 1, end, total);
        let _ = writeln!(out, "{}", "-".repeat(50));
        for i in self.page_start..end {
            let mark = if self.selected[i] { "[X]" } else { "[ ]" };
            let _ = writeln!(out, "{} {:4}. {}", mark, i + 1, self.files[i]);
        }
        if end < total {
            let _ = writeln!(out, "\n... and {} more files", total - end);
        }
        let _ = write!(out, "\nSelected: {}/{} files", self.selected_count(), total);
        out
    }
}

/// Run a full selection session over a sequence of input lines
///
/// An empty file list selects nothing without reading input. Running out of
/// input before `done` or `quit` counts as cancellation.
pub fn select<I, S>(files: &[RelativePath], commands: I) -> SelectionOutcome
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    if files.is_empty() {
        return SelectionOutcome::Selected(Vec::new());
    }

    let mut selection = Selection::new(files);
    for line in commands {
        match selection.apply_line(line.as_ref()) {
            Step::Continue(_) => {}
            Step::Finished(files) => return SelectionOutcome::Selected(files),
            Step::Cancelled => return SelectionOutcome::Cancelled,
        }
    }
    SelectionOutcome::Cancelled
}

#[cfg(test)]
mod tests {
    use super::*;

    fn files(n: usize) -> Vec<RelativePath> {
        (1..=n)
            .map(|i| RelativePath::parse(&format!("src/file{i:02}.rs")).unwrap())
            .collect()
    }

    fn names(paths: &[RelativePath]) -> Vec<&str> {
        paths.iter().map(RelativePath::as_str).collect()
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!("a".parse(), Ok(Command::All));
        assert_eq!("  NONE ".parse(), Ok(Command::None));
        assert_eq!("t 3".parse(), Ok(Command::Toggle(3)));
        assert_eq!("toggle 12".parse(), Ok(Command::Toggle(12)));
        assert_eq!("r 2-5".parse(), Ok(Command::Range(2, 5)));
        assert_eq!("page 2".parse(), Ok(Command::Page(2)));
        assert_eq!("d".parse(), Ok(Command::Done));
        assert_eq!("quit".parse(), Ok(Command::Quit));

        assert!("toggle".parse::<Command>().unwrap_err().starts_with("Usage"));
        assert!("toggle x".parse::<Command>().unwrap_err().starts_with("Invalid number"));
        assert!("range 5".parse::<Command>().unwrap_err().starts_with("Usage"));
        assert!("range a-b".parse::<Command>().unwrap_err().starts_with("Invalid range"));
        assert!("frobnicate".parse::<Command>().unwrap_err().starts_with("Unknown command"));
    }

    #[test]
    fn test_all_selected_by_default() {
        let files = files(3);
        assert_eq!(select(&files, ["done"]), SelectionOutcome::Selected(files.clone()));
    }

    #[test]
    fn test_toggle_and_range() {
        let files = files(6);
        let outcome = select(&files, ["t 1", "r 3-5", "r 4-4", "done"]);
        let SelectionOutcome::Selected(selected) = outcome else {
            panic!("expected a selection");
        };
        assert_eq!(
            names(&selected),
            ["src/file02.rs", "src/file04.rs", "src/file06.rs"]
        );
    }

    #[test]
    fn test_done_requires_a_selection() {
        let files = files(2);
        let mut selection = Selection::new(&files);
        selection.apply(Command::None);
        assert!(matches!(selection.apply(Command::Done), Step::Continue(m) if m.starts_with("No files selected")));

        let outcome = select(&files, ["none", "done", "t 2", "done"]);
        assert_eq!(outcome, SelectionOutcome::Selected(vec![files[1].clone()]));
    }

    #[test]
    fn test_invalid_indices_do_not_change_state() {
        let files = files(3);
        let mut selection = Selection::new(&files);
        for command in [Command::Toggle(0), Command::Toggle(4), Command::Range(3, 2), Command::Range(1, 9)] {
            assert!(matches!(selection.apply(command), Step::Continue(m) if m.starts_with("Invalid")));
        }
        assert_eq!(selection.selected_count(), 3);
    }

    #[test]
    fn test_quit_and_eof_cancel() {
        let files = files(2);
        assert_eq!(select(&files, ["t 1", "q"]), SelectionOutcome::Cancelled);
        assert_eq!(select(&files, ["t 1"]), SelectionOutcome::Cancelled);
        assert_eq!(select(&files, Vec::<String>::new()), SelectionOutcome::Cancelled);
    }

    #[test]
    fn test_empty_list_selects_nothing() {
        assert_eq!(select(&[], ["q"]), SelectionOutcome::Selected(Vec::new()));
    }

    #[test]
    fn test_paging() {
        let files = files(45);
        let mut selection = Selection::new(&files);

        let first = selection.render_page();
        assert!(first.starts_with("Files 1-20 of 45:"));
        assert!(first.contains("... and 25 more files"));

        let Step::Continue(third) = selection.apply(Command::Page(3)) else {
            panic!("expected continue");
        };
        assert!(third.starts_with("Files 41-45 of 45:"));
        assert!(third.contains("[X]   45. src/file45.rs"));
        assert!(!third.contains("more files"));

        let Step::Continue(invalid) = selection.apply(Command::Page(4)) else {
            panic!("expected continue");
        };
        assert_eq!(invalid, "Invalid page. Please use 1-3");
    }

    #[test]
    fn test_render_marks_deselected() {
        let files = files(2);
        let mut selection = Selection::new(&files);
        let Step::Continue(message) = selection.apply(Command::Toggle(2)) else {
            panic!("expected continue");
        };
        assert!(message.starts_with("File #2 deselected: src/file02.rs"));
        assert!(message.contains("[ ]    2. src/file02.rs"));
        assert!(message.ends_with("Selected: 1/2 files"));
    }
}
