use crate::{
    authenticator::user::UserInformation,
    authorizer::{Authorizer, Requirement, RequirementError},
};
use strum::ParseError;

macro_rules! permission {
    (
        $(#[$enum_meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident
            ),* $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant,
            )*
        }

        $(
            pub struct $variant;

            impl Requirement for $variant {
                fn enforce(authorizer: &Authorizer, user: &UserInformation) -> Result<(), RequirementError> {
                    Ok(authorizer.require(user, Permission::$variant)?)
                }
            }

        )*
    };
}

permission! {
    #[derive(
        Copy,
        Clone,
        PartialEq,
        Eq,
        Debug,
        serde::Deserialize,
        serde::Serialize,
        Hash,
        strum::AsRefStr,
        strum::Display,
        strum::EnumString,
        strum::IntoStaticStr,
        strum::VariantArray,
    )]
    #[serde(into = "String")]
    #[serde(try_from = "String")]
    pub enum Permission {
        #[strum(serialize = "upload.file")]
        UploadFile,
        /// Read the files uploaded by the user themselves
        #[strum(serialize = "read.file")]
        ReadFile,
        /// Read all files of the organisation
        #[strum(serialize = "read.allFiles")]
        ReadAllFiles,
        #[strum(serialize = "delete.file")]
        DeleteFile,

        #[strum(serialize = "read.category")]
        ReadCategory,

        #[strum(serialize = "register.employee")]
        RegisterEmployee,
    }
}

impl TryFrom<String> for Permission {
    type Error = ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.as_str().try_into()
    }
}

impl From<Permission> for String {
    fn from(value: Permission) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serde() {
        assert_eq!(
            json!("read.allFiles"),
            serde_json::to_value(Permission::ReadAllFiles).unwrap(),
        );
        assert_eq!(
            Permission::DeleteFile,
            serde_json::from_value(json!("delete.file")).unwrap(),
        );
    }

    #[test]
    fn unknown() {
        assert!(serde_json::from_value::<Permission>(json!("delete.everything")).is_err());
    }
}
