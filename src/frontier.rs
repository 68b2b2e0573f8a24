use std::collections::VecDeque;

use fnv::FnvHashSet;
use log::trace;

use crate::link::{LinkResolver, PageRef};

/// The pages still to visit and the pages already visited.
#[derive(Debug, Clone)]
pub struct Frontier {
    resolver: LinkResolver,
    /// Maximum number of pages to visit.
    budget: usize,
    /// Discovered pages in the order they were found, may hold duplicates.
    pending: VecDeque<PageRef>,
    visited: FnvHashSet<PageRef>,
    visited_count: usize,
}

impl Frontier {
    pub fn new(resolver: LinkResolver, budget: usize) -> Self {
        Self {
            resolver,
            budget,
            pending: VecDeque::new(),
            visited: FnvHashSet::default(),
            visited_count: 0,
        }
    }

    /// Queue a page.
    ///
    /// Pages outside of the crawled site are dropped, duplicates are kept and
    /// skipped once they come up. Returns whether the page was queued.
    pub fn enqueue(&mut self, page: PageRef) -> bool {
        if !self.resolver.contains(page.as_str()) {
            trace!("Not queueing `{}`, outside of {}", page, self.resolver.base());
            return false;
        }
        self.pending.push_back(page);
        true
    }

    /// The next page that was not visited yet, `None` once the queue is
    /// drained or the budget is spent.
    pub fn next(&mut self) -> Option<PageRef> {
        if self.is_exhausted() {
            return None;
        }
        while let Some(page) = self.pending.pop_front() {
            if !self.visited.contains(&page) {
                return Some(page);
            }
        }
        None
    }

    /// Record a processed page. Marking a page twice has no effect.
    pub fn mark_visited(&mut self, page: PageRef) {
        if self.visited_count >= self.budget {
            return;
        }
        if self.visited.insert(page) {
            self.visited_count += 1;
        }
    }

    pub fn is_visited(&self, page: &str) -> bool {
        self.visited.contains(page)
    }

    pub fn is_exhausted(&self) -> bool {
        self.visited_count >= self.budget
    }

    pub fn visited_count(&self) -> usize {
        self.visited_count
    }

    pub fn visited(&self) -> impl Iterator<Item = &PageRef> {
        self.visited.iter()
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn budget(&self) -> usize {
        self.budget
    }

    pub fn resolver(&self) -> &LinkResolver {
        &self.resolver
    }
}
