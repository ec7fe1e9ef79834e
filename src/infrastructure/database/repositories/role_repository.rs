use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter};

use super::db_err;
use crate::domain::{DomainResult, Role};
use crate::infrastructure::database::entities::role;

pub(crate) fn role_model_to_domain(model: role::Model) -> Role {
    Role {
        id: model.id,
        name: model.name,
    }
}

pub async fn find_by_name<C: ConnectionTrait>(conn: &C, name: &str) -> DomainResult<Option<Role>> {
    let model = role::Entity::find()
        .filter(role::Column::Name.eq(name))
        .one(conn)
        .await
        .map_err(db_err)?;

    Ok(model.map(role_model_to_domain))
}
