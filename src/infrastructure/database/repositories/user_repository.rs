use sea_orm::{
    ActiveModelTrait, ActiveValue::Unchanged, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    LoaderTrait, ModelTrait, Order, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Select,
    Set,
};

use super::db_err;
use super::role_repository::role_model_to_domain;
use crate::domain::{DomainError, DomainResult, Role, User};
use crate::infrastructure::database::entities::{role, user, user_role};
use crate::shared::{Page, PageRequest, SortDirection, SortField};

// ── Conversion helpers ──────────────────────────────────────────

fn user_model_to_domain(model: user::Model, roles: Vec<role::Model>) -> User {
    let mut roles: Vec<Role> = roles.into_iter().map(role_model_to_domain).collect();
    // Role ids follow seeding order, which is also the derivation order.
    roles.sort_by_key(|r| r.id);

    let mut user = User {
        id: Some(model.id),
        name: model.name,
        lastname: model.lastname,
        username: model.username,
        email: model.email,
        password: model.password,
        roles,
        admin: false,
    };
    user.sync_admin_flag();
    user
}

fn sort_column(field: SortField) -> user::Column {
    match field {
        SortField::Id => user::Column::Id,
        SortField::Name => user::Column::Name,
        SortField::Lastname => user::Column::Lastname,
        SortField::Username => user::Column::Username,
        SortField::Email => user::Column::Email,
    }
}

fn apply_sort(query: Select<user::Entity>, request: &PageRequest) -> Select<user::Entity> {
    match request.sort {
        Some(sort) => {
            let order = match sort.direction {
                SortDirection::Asc => Order::Asc,
                SortDirection::Desc => Order::Desc,
            };
            // Id as tie-breaker keeps pages stable across requests.
            query
                .order_by(sort_column(sort.field), order)
                .order_by_asc(user::Column::Id)
        }
        None => query.order_by_asc(user::Column::Id),
    }
}

async fn with_roles<C: ConnectionTrait>(
    conn: &C,
    models: Vec<user::Model>,
) -> DomainResult<Vec<User>> {
    let roles = models
        .load_many_to_many(role::Entity, user_role::Entity, conn)
        .await
        .map_err(db_err)?;

    Ok(models
        .into_iter()
        .zip(roles)
        .map(|(model, roles)| user_model_to_domain(model, roles))
        .collect())
}

// ── Queries ─────────────────────────────────────────────────────

pub async fn find_all<C: ConnectionTrait>(conn: &C) -> DomainResult<Vec<User>> {
    let models = user::Entity::find()
        .order_by_asc(user::Column::Id)
        .all(conn)
        .await
        .map_err(db_err)?;

    with_roles(conn, models).await
}

pub async fn find_page<C: ConnectionTrait>(
    conn: &C,
    request: &PageRequest,
) -> DomainResult<Page<User>> {
    let query = apply_sort(user::Entity::find(), request);

    let total = query.clone().count(conn).await.map_err(db_err)?;

    // An offset that does not fit a signed bind parameter is past every row.
    let Some(offset) = request.sql_offset() else {
        return Ok(Page::new(Vec::new(), request, total));
    };

    let models = query
        .offset(offset as u64)
        .limit(request.size)
        .all(conn)
        .await
        .map_err(db_err)?;

    let users = with_roles(conn, models).await?;
    Ok(Page::new(users, request, total))
}

pub async fn find_by_id<C: ConnectionTrait>(conn: &C, id: i64) -> DomainResult<Option<User>> {
    let Some(model) = user::Entity::find_by_id(id)
        .one(conn)
        .await
        .map_err(db_err)?
    else {
        return Ok(None);
    };

    let roles = model
        .find_related(role::Entity)
        .all(conn)
        .await
        .map_err(db_err)?;

    Ok(Some(user_model_to_domain(model, roles)))
}

// ── Commands ────────────────────────────────────────────────────

pub async fn save<C: ConnectionTrait>(conn: &C, user: User) -> DomainResult<User> {
    let mut active = user::ActiveModel {
        name: Set(user.name.clone()),
        lastname: Set(user.lastname.clone()),
        username: Set(user.username.clone()),
        email: Set(user.email.clone()),
        password: Set(user.password.clone()),
        ..Default::default()
    };

    let model = match user.id {
        None => active.insert(conn).await.map_err(db_err)?,
        Some(id) => {
            active.id = Unchanged(id);
            active.update(conn).await.map_err(|e| match e {
                DbErr::RecordNotUpdated => DomainError::NotFound {
                    entity: "User",
                    field: "id",
                    value: id.to_string(),
                },
                other => db_err(other),
            })?
        }
    };

    replace_role_links(conn, model.id, &user.roles).await?;

    Ok(User {
        id: Some(model.id),
        name: model.name,
        lastname: model.lastname,
        username: model.username,
        email: model.email,
        password: model.password,
        roles: user.roles,
        admin: user.admin,
    })
}

async fn replace_role_links<C: ConnectionTrait>(
    conn: &C,
    user_id: i64,
    roles: &[Role],
) -> DomainResult<()> {
    user_role::Entity::delete_many()
        .filter(user_role::Column::UserId.eq(user_id))
        .exec(conn)
        .await
        .map_err(db_err)?;

    if roles.is_empty() {
        return Ok(());
    }

    let links = roles.iter().map(|role| user_role::ActiveModel {
        user_id: Set(user_id),
        role_id: Set(role.id),
    });

    // Composite key: skip RETURNING / last-insert-id handling.
    user_role::Entity::insert_many(links)
        .exec_without_returning(conn)
        .await
        .map_err(db_err)?;

    Ok(())
}

pub async fn delete_by_id<C: ConnectionTrait>(conn: &C, id: i64) -> DomainResult<()> {
    user_role::Entity::delete_many()
        .filter(user_role::Column::UserId.eq(id))
        .exec(conn)
        .await
        .map_err(db_err)?;

    user::Entity::delete_by_id(id)
        .exec(conn)
        .await
        .map_err(db_err)?;

    Ok(())
}
