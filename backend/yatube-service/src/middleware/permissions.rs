/// Authorization module for yatube-service
///
/// Author-or-read-only: reads pass for everyone, writes pass only for the
/// object's author.
use actix_middleware::Requester;

use crate::error::{AppError, Result};
use crate::models::{Comment, Post};

/// Kind of access being requested on an object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Read,
    Write,
}

/// Objects owned by a single user.
pub trait Authored {
    fn author_id(&self) -> i64;
}

impl Authored for Post {
    fn author_id(&self) -> i64 {
        self.author_id
    }
}

impl Authored for Comment {
    fn author_id(&self) -> i64 {
        self.author_id
    }
}

/// Check an object-level permission for `requester`.
pub fn check_object_permission<T: Authored>(
    requester: Option<&Requester>,
    access: Access,
    object: &T,
) -> Result<()> {
    match (access, requester) {
        (Access::Read, _) => Ok(()),
        (Access::Write, Some(requester)) if requester.id == object.author_id() => Ok(()),
        (Access::Write, _) => Err(AppError::forbidden()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Owned(i64);

    impl Authored for Owned {
        fn author_id(&self) -> i64 {
            self.0
        }
    }

    fn requester(id: i64) -> Requester {
        Requester {
            id,
            username: format!("user{}", id),
        }
    }

    #[test]
    fn test_read_always_allowed() {
        assert!(check_object_permission(None, Access::Read, &Owned(1)).is_ok());
        assert!(check_object_permission(Some(&requester(2)), Access::Read, &Owned(1)).is_ok());
    }

    #[test]
    fn test_write_requires_author() {
        assert!(check_object_permission(Some(&requester(1)), Access::Write, &Owned(1)).is_ok());
        assert!(matches!(
            check_object_permission(Some(&requester(2)), Access::Write, &Owned(1)),
            Err(AppError::Forbidden(_))
        ));
        assert!(matches!(
            check_object_permission(None, Access::Write, &Owned(1)),
            Err(AppError::Forbidden(_))
        ));
    }
}
