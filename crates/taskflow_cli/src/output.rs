//! Terminal rendering: board tables on stdout, notices on stderr.

use taskflow_core::{BoardStore, BoardView, Notice, Severity};

/// `BoardView` for one-shot CLI invocations.
#[derive(Debug, Default)]
pub struct TerminalView {
    /// Print the board on every refresh after startup.
    pub echo_board: bool,
}

impl BoardView for TerminalView {
    fn refresh(&mut self, board: &BoardStore, history_len: usize) {
        if self.echo_board {
            print_board(board, history_len);
        }
    }

    fn notify(&mut self, notice: &Notice) {
        let marker = match notice.severity {
            Severity::Success => "ok",
            Severity::Error => "error",
        };
        eprintln!("[{marker}] {}: {}", notice.title, notice.description);
    }
}

pub fn print_board(board: &BoardStore, history_len: usize) {
    for list in board.sorted_lists() {
        let tasks = board.tasks_in_list(list.id);
        println!("#{} {} ({})", list.id, list.title, tasks.len());
        for task in tasks {
            let check = if task.done { "x" } else { " " };
            println!("  [{check}] #{} {}", task.id, task.title);
            if !task.description.is_empty() {
                println!("        {}", task.description);
            }
        }
    }
    if history_len > 0 {
        println!("({history_len} change(s) can be undone)");
    }
}
