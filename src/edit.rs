//! Programmatic construction and editing of service trees
//!
//! ```rust
//! use boardarchive::model::{Post, Service, Thread};
//! use boardarchive::edit::add_service;
//!
//! let mut services = Vec::new();
//! let service = add_service(&mut services, Service::new(1, "Demo", "Forum", "https://demo.example"));
//! service.add_thread(Thread { thread: Some(1), title: "Hello".into(), ..Default::default() });
//! service.add_post(1, Post { post: Some(1), ..Default::default() })?;
//! assert_eq!(services[0].post_count(), 1);
//! # Ok::<(), boardarchive::ArchiveError>(())
//! ```

use crate::error::{ArchiveError, Result};
use crate::model::{Category, Poll, Post, Service, Thread, User};

/// Append a service and return a handle to it.
pub fn add_service(services: &mut Vec<Service>, service: Service) -> &mut Service {
    services.push(service);
    let last = services.len() - 1;
    &mut services[last]
}

/// Remove the service with the given entry number.
pub fn remove_service(services: &mut Vec<Service>, entry: u64) -> Result<Service> {
    let index = services
        .iter()
        .position(|s| s.entry == Some(entry))
        .ok_or_else(|| ArchiveError::NotFound(format!("Service entry {}", entry)))?;
    Ok(services.remove(index))
}

impl Service {
    /// New empty service in the `UTC` time zone
    pub fn new(
        entry: u64,
        name: impl Into<String>,
        service_type: impl Into<String>,
        location: impl Into<String>,
    ) -> Self {
        Self {
            entry: Some(entry),
            service: Some(name.into()),
            service_type: Some(service_type.into()),
            service_location: Some(location.into()),
            ..Default::default()
        }
    }

    /// Insert or replace a user.
    pub fn add_user(&mut self, id: u64, user: User) -> Option<User> {
        self.users.insert(id, user)
    }

    /// Remove a user, keeping the order of the others.
    pub fn remove_user(&mut self, id: u64) -> Result<User> {
        self.users
            .shift_remove(&id)
            .ok_or_else(|| ArchiveError::NotFound(format!("User ID {}", id)))
    }

    /// Append a category and record its level in the categorization.
    ///
    /// `Kind` and the derived `Type`/`Level` are kept consistent: whichever
    /// side is filled in determines the other. A nonzero `InSub` must name
    /// a category of the same type already in the service.
    pub fn add_category(&mut self, mut category: Category) -> Result<()> {
        if category.kind.is_empty() {
            category.kind = format!("{}, {}", category.kind_type, category.level);
        } else {
            category.derive_type_and_level();
        }

        if let Some(in_sub) = category.in_sub.filter(|id| *id != 0) {
            let parent_exists = self
                .categories
                .iter()
                .any(|c| c.kind_type == category.kind_type && c.id == Some(in_sub));
            if !parent_exists {
                return Err(ArchiveError::InvalidReference(format!(
                    "InSub value {} does not match any {} ID",
                    in_sub, category.kind_type
                )));
            }
        }

        let levels = self
            .categorization
            .entry(category.kind_type.clone())
            .or_default();
        if !category.level.is_empty() && !levels.contains(&category.level) {
            levels.push(category.level.clone());
        }
        self.categories.push(category);
        Ok(())
    }

    /// Remove the first category with the given ID.
    pub fn remove_category(&mut self, id: u64) -> Result<Category> {
        let index = self
            .categories
            .iter()
            .position(|c| c.id == Some(id))
            .ok_or_else(|| ArchiveError::NotFound(format!("Category ID {}", id)))?;
        Ok(self.categories.remove(index))
    }

    /// Append a thread.
    pub fn add_thread(&mut self, thread: Thread) {
        self.message_threads.push(thread);
    }

    /// Remove a thread by ID.
    pub fn remove_thread(&mut self, thread: u64) -> Result<Thread> {
        let index = self
            .message_threads
            .iter()
            .position(|t| t.thread == Some(thread))
            .ok_or_else(|| thread_not_found(thread))?;
        Ok(self.message_threads.remove(index))
    }

    /// Mutable lookup of a thread by ID.
    pub fn thread_mut(&mut self, thread: u64) -> Result<&mut Thread> {
        self.message_threads
            .iter_mut()
            .find(|t| t.thread == Some(thread))
            .ok_or_else(|| thread_not_found(thread))
    }

    /// Append a post to a thread, rejecting a repeated `Post` number.
    pub fn add_post(&mut self, thread: u64, post: Post) -> Result<()> {
        let target = self.thread_mut(thread)?;
        if let Some(number) = post.post {
            if target.post(number).is_some() {
                return Err(ArchiveError::InvalidReference(format!(
                    "Post {} already exists in thread {}",
                    number, thread
                )));
            }
        }
        target.messages.push(post);
        Ok(())
    }

    /// Remove a post from a thread.
    pub fn remove_post(&mut self, thread: u64, post: u64) -> Result<Post> {
        let target = self.thread_mut(thread)?;
        let index = target
            .messages
            .iter()
            .position(|p| p.post == Some(post))
            .ok_or_else(|| post_not_found(thread, post))?;
        Ok(target.messages.remove(index))
    }

    /// Attach a poll to a post.
    pub fn add_poll(&mut self, thread: u64, post: u64, poll: Poll) -> Result<()> {
        let target = self
            .thread_mut(thread)?
            .messages
            .iter_mut()
            .find(|p| p.post == Some(post))
            .ok_or_else(|| post_not_found(thread, post))?;
        target.polls.get_or_insert_with(Vec::new).push(poll);
        Ok(())
    }
}

fn thread_not_found(thread: u64) -> ArchiveError {
    ArchiveError::NotFound(format!("Thread ID {}", thread))
}

fn post_not_found(thread: u64, post: u64) -> ArchiveError {
    ArchiveError::NotFound(format!("Post ID {} in thread {}", post, thread))
}
