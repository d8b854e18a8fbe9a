//! Navigation and request scheduling for the three views.
//!
//! `App` owns the active screen and a FIFO of requests. The runtime calls
//! [`App::run_pending`] once per loop turn, so at most one request is in flight
//! and the screen can be redrawn in between (loading indicator, disabled
//! submit button).
//!
//! Every navigation bumps the view epoch. Requests are never cancelled by
//! navigation; a response tagged with an old epoch is dropped unapplied.

use crate::api::InterpretationApi;
use crate::error::ApiResult;
use crate::request::{Outcome, Request};
use crate::views::{CreateView, EditView, ListView, Route};
use std::collections::VecDeque;

/// The active view and its state.
#[derive(Debug, Clone)]
pub enum Screen {
    List(ListView),
    Create(CreateView),
    Edit(EditView),
}

impl Screen {
    pub fn route(&self) -> Route {
        match self {
            Screen::List(_) => Route::List,
            Screen::Create(_) => Route::Create,
            Screen::Edit(view) => Route::Edit(view.id().to_string()),
        }
    }
}

/// A queued request and the view epoch that issued it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    pub epoch: u64,
    pub request: Request,
}

pub struct App<A> {
    api: A,
    screen: Screen,
    epoch: u64,
    queue: VecDeque<Ticket>,
    pub should_quit: bool,
}

impl<A: InterpretationApi> App<A> {
    /// Start on the list route; its load request is queued immediately.
    pub fn new(api: A) -> Self {
        let mut app = Self {
            api,
            screen: Screen::List(ListView::new()),
            epoch: 0,
            queue: VecDeque::new(),
            should_quit: false,
        };
        app.navigate(Route::List);
        app
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn route(&self) -> Route {
        self.screen.route()
    }

    /// Replace the active view with a fresh one for `route`.
    pub fn navigate(&mut self, route: Route) {
        self.epoch += 1;
        tracing::info!(route = ?route, epoch = self.epoch, "navigate");

        self.screen = match route {
            Route::List => {
                let mut view = ListView::new();
                let request = view.load_request();
                self.enqueue(request);
                Screen::List(view)
            }
            Route::Create => Screen::Create(CreateView::new()),
            Route::Edit(id) => {
                let view = EditView::new(id);
                self.enqueue(view.load_request());
                Screen::Edit(view)
            }
        };
    }

    pub fn has_pending(&self) -> bool {
        !self.queue.is_empty()
    }

    /// Execute the oldest queued request and apply its result.
    /// Returns `false` when nothing was queued.
    pub fn run_pending(&mut self) -> bool {
        let Some(ticket) = self.queue.pop_front() else {
            return false;
        };

        tracing::debug!(method = ticket.request.method(), epoch = ticket.epoch, "executing request");
        let result = ticket.request.execute(&self.api);
        self.resolve(ticket, result);
        true
    }

    /// Drain the queue, including requests queued by navigation on the way.
    pub fn run_until_idle(&mut self) {
        while self.run_pending() {}
    }

    /// Apply a response to the view that issued it.
    pub fn resolve(&mut self, ticket: Ticket, result: ApiResult<Outcome>) {
        if ticket.epoch != self.epoch {
            tracing::debug!(
                method = ticket.request.method(),
                epoch = ticket.epoch,
                current = self.epoch,
                "dropping response for a view that is gone"
            );
            return;
        }

        let next = match (&mut self.screen, ticket.request) {
            (Screen::List(view), Request::ListAll) => {
                view.apply_loaded(result.and_then(Outcome::into_records));
                None
            }
            (Screen::List(view), Request::Delete { id }) => {
                view.finish_delete(&id, result.map(drop));
                None
            }
            (Screen::Create(view), Request::Create { .. }) => view.apply_submitted(result.map(drop)),
            (Screen::Edit(view), Request::FetchOne { .. }) => {
                view.apply_loaded(result.and_then(Outcome::into_record));
                None
            }
            (Screen::Edit(view), Request::Update { .. }) => view.apply_submitted(result.map(drop)),
            (screen, request) => {
                tracing::warn!(route = ?screen.route(), method = request.method(), "response does not belong to this view");
                None
            }
        };

        if let Some(route) = next {
            self.navigate(route);
        }
    }

    // ------------------------------------------------------------------
    // User actions
    // ------------------------------------------------------------------

    pub fn open_create(&mut self) {
        self.navigate(Route::Create);
    }

    /// Edit the selected row (list view only).
    pub fn edit_selected(&mut self) {
        let route = match &self.screen {
            Screen::List(view) => view.edit_route(),
            _ => None,
        };
        if let Some(route) = route {
            self.navigate(route);
        }
    }

    pub fn delete_selected(&mut self) {
        let id = match &self.screen {
            Screen::List(view) => view.selected_record().map(|r| r.id.clone()),
            _ => None,
        };
        if let Some(id) = id {
            self.delete(&id);
        }
    }

    pub fn delete(&mut self, id: &str) {
        let request = match &mut self.screen {
            Screen::List(view) => view.begin_delete(id),
            _ => None,
        };
        if let Some(request) = request {
            self.enqueue(request);
        }
    }

    pub fn reload(&mut self) {
        let request = match &mut self.screen {
            Screen::List(view) => Some(view.load_request()),
            _ => None,
        };
        if let Some(request) = request {
            self.enqueue(request);
        }
    }

    pub fn submit(&mut self) {
        let request = match &mut self.screen {
            Screen::Create(view) => view.submit_request(),
            Screen::Edit(view) => view.submit_request(),
            Screen::List(_) => None,
        };
        if let Some(request) = request {
            self.enqueue(request);
        }
    }

    pub fn back_to_list(&mut self) {
        self.navigate(Route::List);
    }

    pub fn select_next(&mut self) {
        if let Screen::List(view) = &mut self.screen {
            view.select_next();
        }
    }

    pub fn select_previous(&mut self) {
        if let Screen::List(view) = &mut self.screen {
            view.select_previous();
        }
    }

    pub fn input_char(&mut self, c: char) {
        if let Some(form) = self.form_mut() {
            form.insert_char(c);
        }
    }

    pub fn backspace(&mut self) {
        if let Some(form) = self.form_mut() {
            form.delete_char();
        }
    }

    pub fn focus_next(&mut self) {
        if let Some(form) = self.form_mut() {
            form.focus_next();
        }
    }

    pub fn form_mut(&mut self) -> Option<&mut crate::views::FormState> {
        match &mut self.screen {
            Screen::Create(view) => Some(&mut view.form),
            Screen::Edit(view) => Some(&mut view.form),
            Screen::List(_) => None,
        }
    }

    fn enqueue(&mut self, request: Request) {
        self.queue.push_back(Ticket {
            epoch: self.epoch,
            request,
        });
    }
}
