// Action system for pager commands
// Keys are mapped to actions, actions are applied by the viewport manager

/// All possible actions that can be triggered from the keyboard
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    // Navigation actions
    Navigate(NavigateAction),

    // View operations
    CycleColumnWidthMode,
    RefreshView,

    // Application control
    Quit,
}

/// Navigation actions with optional counts for vim-style motions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigateAction {
    Up(usize),
    Down(usize),
    Left(usize),
    Right(usize),
    PageUp,
    PageDown,
    HalfPageDown,
    Home,
    End,
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::Navigate(nav) => write!(f, "Navigate({:?})", nav),
            Action::CycleColumnWidthMode => write!(f, "CycleColumnWidthMode"),
            Action::RefreshView => write!(f, "RefreshView"),
            Action::Quit => write!(f, "Quit"),
        }
    }
}
