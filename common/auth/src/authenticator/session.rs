//! Resolving the user of a session

use super::{user::UserDetails, Claims};
use sea_orm::{ConnectionTrait, DbErr, EntityTrait};
use venter_entity::{profile, user};

/// Load the current identity of the user a session was issued to.
///
/// Returns `None` if the user is gone, was deactivated, or its sessions were ended after the
/// token was issued.
pub async fn resolve<C: ConnectionTrait>(
    claims: &Claims,
    connection: &C,
) -> Result<Option<UserDetails>, DbErr> {
    let Ok(id) = claims.user_id() else {
        return Ok(None);
    };

    let Some((user, profile)) = user::Entity::find_by_id(id)
        .find_also_related(profile::Entity)
        .one(connection)
        .await?
    else {
        log::debug!("session of unknown user {id}");
        return Ok(None);
    };

    if !user.is_active {
        log::debug!("session of inactive user {}", user.username);
        return Ok(None);
    }

    if user.session_version != claims.ver {
        log::debug!("ended session of user {}", user.username);
        return Ok(None);
    }

    Ok(Some((user, profile).into()))
}
