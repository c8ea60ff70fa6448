//! Interactive loop driving a handler over a stream of events until the handler is done with them.
//! Pointer window selection is the one handler the library ships.
use tracing::{debug, error, trace};

use crate::{model::WindowId, ErrorWrapper, SubtlextResult};

/// Step is the decision of a handler after seeing one event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step<T> {
    Continue,
    Done(T),
    Cancel,
}

/// LoopOutcome is how an interactive loop ended
#[derive(Debug)]
pub enum LoopOutcome<T> {
    Completed(T),
    CancelledByHandler,
    Error(ErrorWrapper),
}

impl<T> LoopOutcome<T> {
    /// Value of a completed loop. Errors are logged and turned into `None`.
    pub fn into_option(self) -> Option<T> {
        match self {
            LoopOutcome::Completed(val) => Some(val),
            LoopOutcome::CancelledByHandler => None,
            LoopOutcome::Error(err) => {
                error!("interactive loop failed: {}", err);
                None
            }
        }
    }
}

/// Feed events to the handler until it is done, cancels or fails. An event source that runs dry
/// ends the loop as cancelled.
///
/// ### Arguments
/// * `events` - event source, errors terminate the loop
/// * `handler` - decides what to do after each event
pub fn run_loop<E, T, I, F>(events: I, mut handler: F) -> LoopOutcome<T>
where
    I: IntoIterator<Item = SubtlextResult<E>>,
    F: FnMut(E) -> SubtlextResult<Step<T>>,
{
    for event in events {
        let step = match event.and_then(&mut handler) {
            Ok(step) => step,
            Err(err) => return LoopOutcome::Error(err),
        };
        match step {
            Step::Continue => continue,
            Step::Done(val) => return LoopOutcome::Completed(val),
            Step::Cancel => {
                debug!("run_loop: cancelled by handler");
                return LoopOutcome::CancelledByHandler;
            }
        }
    }
    debug!("run_loop: event source exhausted");
    LoopOutcome::CancelledByHandler
}

/// Pointer button events seen on the root window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEvent {
    /// Button press, `child` is the top level window under the pointer if any
    Press { child: Option<WindowId> },
    Release,
}

/// PointerSelection remembers the window of the first press and finishes once every pressed
/// button was released again
#[derive(Debug, Clone)]
pub struct PointerSelection {
    root: WindowId,
    buttons: u32,
    picked: Option<WindowId>,
}

impl PointerSelection {
    /// Presses outside of any window pick the root window
    pub fn new(root: WindowId) -> Self {
        Self { root, buttons: 0, picked: None }
    }

    pub fn handle(&mut self, event: PointerEvent) -> SubtlextResult<Step<WindowId>> {
        match event {
            PointerEvent::Press { child } => {
                if self.picked.is_none() {
                    self.picked = Some(child.unwrap_or(self.root));
                }
                self.buttons += 1;
            }
            PointerEvent::Release => self.buttons = self.buttons.saturating_sub(1),
        }
        trace!("select: event: {:?}, buttons: {}, picked: {:?}", event, self.buttons, self.picked);
        Ok(match self.picked {
            Some(win) if self.buttons == 0 => Step::Done(win),
            _ => Step::Continue,
        })
    }
}

/// First window in depth first order, starting below `top`, that `is_client` accepts. `top`
/// itself is returned when no descendant qualifies.
pub fn find_client<C, K>(top: WindowId, mut children: C, mut is_client: K) -> SubtlextResult<WindowId>
where
    C: FnMut(WindowId) -> SubtlextResult<Vec<WindowId>>,
    K: FnMut(WindowId) -> SubtlextResult<bool>,
{
    let mut stack: Vec<WindowId> = children(top)?.into_iter().rev().collect();
    while let Some(win) = stack.pop() {
        if is_client(win)? {
            return Ok(win);
        }
        stack.extend(children(win)?.into_iter().rev());
    }
    Ok(top)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SubtlextError;

    fn select(events: Vec<PointerEvent>) -> LoopOutcome<WindowId> {
        let mut selection = PointerSelection::new(1);
        run_loop(events.into_iter().map(Ok), |x| selection.handle(x))
    }

    #[test]
    fn test_press_release_selects() {
        let outcome = select(vec![PointerEvent::Press { child: Some(42) }, PointerEvent::Release]);
        assert!(matches!(outcome, LoopOutcome::Completed(42)));
    }

    #[test]
    fn test_first_press_wins_and_waits_for_all_releases() {
        let outcome = select(vec![
            PointerEvent::Press { child: Some(42) },
            PointerEvent::Press { child: Some(7) },
            PointerEvent::Release,
        ]);
        assert!(matches!(outcome, LoopOutcome::CancelledByHandler));

        let outcome = select(vec![
            PointerEvent::Release,
            PointerEvent::Press { child: Some(42) },
            PointerEvent::Press { child: Some(7) },
            PointerEvent::Release,
            PointerEvent::Release,
        ]);
        assert!(matches!(outcome, LoopOutcome::Completed(42)));
    }

    #[test]
    fn test_press_on_root() {
        let outcome = select(vec![PointerEvent::Press { child: None }, PointerEvent::Release]);
        assert_eq!(outcome.into_option(), Some(1));
    }

    #[test]
    fn test_error_terminates() {
        let events: Vec<SubtlextResult<PointerEvent>> = vec![
            Ok(PointerEvent::Press { child: Some(3) }),
            Err(SubtlextError::NotRunning.into()),
            Ok(PointerEvent::Release),
        ];
        let mut selection = PointerSelection::new(1);
        let outcome = run_loop(events, |x| selection.handle(x));
        assert!(matches!(outcome, LoopOutcome::Error(ref err) if err.subtlext() == Some(&SubtlextError::NotRunning)));
        assert_eq!(outcome.into_option(), None);
    }

    #[test]
    fn test_handler_cancel() {
        let outcome: LoopOutcome<()> = run_loop(vec![Ok(1), Ok(2)], |x| Ok(if x == 1 { Step::Cancel } else { Step::Done(()) }));
        assert!(matches!(outcome, LoopOutcome::CancelledByHandler));
    }

    #[test]
    fn test_find_client() {
        // 10 is a frame holding 11 and 12, only 12 carries WM_STATE
        let children = |win: WindowId| -> SubtlextResult<Vec<WindowId>> {
            Ok(match win {
                10 => vec![11, 12],
                11 => vec![13],
                _ => vec![],
            })
        };
        assert_eq!(find_client(10, children, |x| Ok(x == 12)).unwrap(), 12);
        assert_eq!(find_client(10, children, |x| Ok(x == 13)).unwrap(), 13);
        assert_eq!(find_client(10, children, |_| Ok(false)).unwrap(), 10);
    }
}
