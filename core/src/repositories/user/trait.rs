//! User repository trait defining the interface for user data persistence.

use async_trait::async_trait;

use crate::domain::entities::user::{NewUser, User};
use crate::errors::DomainError;

/// Repository trait for User entity persistence operations
///
/// Implementations own id assignment and must enforce email uniqueness.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Create a new user in the repository
    ///
    /// # Arguments
    /// * `user` - The unsaved user
    ///
    /// # Returns
    /// * `Ok(User)` - The created user with its store-assigned id
    /// * `Err(DomainError::Auth(AuthError::Conflict))` - The email is taken
    /// * `Err(DomainError)` - Creation failed
    ///
    /// # Example
    /// ```no_run
    /// # use gk_core::repositories::UserRepository;
    /// # use gk_core::domain::entities::user::NewUser;
    /// # async fn example(repo: &impl UserRepository) -> Result<(), Box<dyn std::error::Error>> {
    /// let new_user = NewUser::new("Ann", "ann@x.com", "$2b$12$...");
    ///
    /// let created_user = repo.create(new_user).await?;
    /// println!("Created user with ID: {}", created_user.id);
    /// # Ok(())
    /// # }
    /// ```
    async fn create(&self, user: NewUser) -> Result<User, DomainError>;

    /// Find a user by email
    ///
    /// # Returns
    /// * `Ok(Some(User))` - User found
    /// * `Ok(None)` - No user registered with this email
    /// * `Err(DomainError)` - Database or other error occurred
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;

    /// Find a user by their unique identifier
    ///
    /// # Returns
    /// * `Ok(Some(User))` - User found
    /// * `Ok(None)` - No user found with given ID
    /// * `Err(DomainError)` - Database or other error occurred
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, DomainError>;
}
