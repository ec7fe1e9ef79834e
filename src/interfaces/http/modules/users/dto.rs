//! User DTOs

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{User, UserRequest};
use crate::shared::{Page, PageRequest, SortDirection, SortField};

/// User API representation. The password hash is never exposed.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserDto {
    pub id: i64,
    pub name: String,
    pub lastname: String,
    pub username: String,
    pub email: String,
    pub admin: bool,
    /// Role names, `ROLE_USER` first
    pub roles: Vec<String>,
}

impl From<User> for UserDto {
    fn from(u: User) -> Self {
        Self {
            id: u.id.unwrap_or_default(),
            admin: u.admin,
            roles: u.roles.into_iter().map(|r| r.name).collect(),
            name: u.name,
            lastname: u.lastname,
            username: u.username,
            email: u.email,
        }
    }
}

/// Create user request
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateUserRequest {
    pub name: String,
    pub lastname: String,
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub admin: bool,
}

impl From<CreateUserRequest> for User {
    fn from(r: CreateUserRequest) -> Self {
        User::new(r.name, r.lastname, r.username, r.email, r.password).with_admin(r.admin)
    }
}

/// Update user request. The password cannot be changed here.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateUserRequest {
    pub name: String,
    pub lastname: String,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub admin: bool,
}

impl From<UpdateUserRequest> for UserRequest {
    fn from(r: UpdateUserRequest) -> Self {
        UserRequest {
            name: r.name,
            lastname: r.lastname,
            email: r.email,
            username: r.username,
            admin: r.admin,
        }
    }
}

/// Page query parameters
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct PageParams {
    /// Page size (default 4)
    pub size: Option<u64>,
    /// Sort field: id, name, lastname, username, email
    #[param(value_type = Option<String>)]
    pub sort: Option<SortField>,
    /// asc or desc
    #[param(value_type = Option<String>)]
    pub direction: Option<SortDirection>,
}

impl PageParams {
    pub fn to_request(&self, page: u64) -> PageRequest {
        let request = PageRequest::of(page, self.size.unwrap_or(PageRequest::DEFAULT_SIZE));
        match self.sort {
            Some(field) => request.with_sort(field, self.direction.unwrap_or_default()),
            None => request,
        }
    }
}

/// One page of users
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserPageDto {
    pub content: Vec<UserDto>,
    /// Zero-based page index
    pub page: u64,
    pub size: u64,
    pub total_elements: u64,
    pub total_pages: u64,
    pub last: bool,
}

impl From<Page<User>> for UserPageDto {
    fn from(page: Page<User>) -> Self {
        let last = page.is_last();
        let page = page.map(UserDto::from);
        Self {
            content: page.content,
            page: page.page,
            size: page.size,
            total_elements: page.total_elements,
            total_pages: page.total_pages,
            last,
        }
    }
}
