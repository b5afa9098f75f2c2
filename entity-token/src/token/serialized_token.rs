use crate::context::DataContext;
use crate::error::{DataError, DataResult};
use crate::token::{DataEntityToken, EntityToken};
use bon::Builder;
use serde::{Deserialize, Serialize};

/// 序列化令牌信封：令牌种类 + 令牌自身的序列化串
#[derive(Debug, Clone, PartialEq, Eq, Builder, Serialize, Deserialize)]
pub struct SerializedEntityToken {
    #[builder(into)]
    kind: String,
    #[builder(into)]
    payload: String,
}

impl SerializedEntityToken {
    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn payload(&self) -> &str {
        &self.payload
    }

    /// 从令牌创建信封
    pub fn from_token(token: &dyn EntityToken) -> DataResult<Self> {
        Ok(Self {
            kind: token.kind().to_string(),
            payload: token.serialize()?.to_string(),
        })
    }

    /// 将信封还原为数据令牌；种类不符时返回 `TypeMismatch`
    pub fn to_data_token(&self, ctx: DataContext) -> DataResult<DataEntityToken> {
        if self.kind != DataEntityToken::KIND {
            return Err(DataError::TypeMismatch {
                expected: DataEntityToken::KIND.to_string(),
                found: self.kind.clone(),
            });
        }
        Ok(DataEntityToken::deserialize(ctx, self.payload.clone()))
    }

    pub fn to_json(&self) -> DataResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(s: &str) -> DataResult<Self> {
        Ok(serde_json::from_str(s)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facade::InMemoryDataFacade;
    use crate::resolver::TypeRegistry;
    use std::sync::Arc;

    fn ctx() -> DataContext {
        DataContext::builder()
            .type_resolver(Arc::new(TypeRegistry::new()))
            .facade(Arc::new(InMemoryDataFacade::new()))
            .build()
    }

    #[test]
    fn envelope_roundtrip_keeps_payload() {
        let token = DataEntityToken::deserialize(ctx(), r#"{"provider":"p","type":"T","id":{}}"#);
        let env = SerializedEntityToken::from_token(&token).unwrap();
        assert_eq!(env.kind(), DataEntityToken::KIND);

        let json = env.to_json().unwrap();
        let back = SerializedEntityToken::from_json(&json).unwrap();
        assert_eq!(back, env);

        let restored = back.to_data_token(ctx()).unwrap();
        assert_eq!(restored, token);
    }

    // 种类不匹配应报错
    #[test]
    fn foreign_kind_is_type_mismatch() {
        let env = SerializedEntityToken::builder()
            .kind("PageElementToken")
            .payload("x")
            .build();
        match env.to_data_token(ctx()).unwrap_err() {
            DataError::TypeMismatch { expected, found } => {
                assert_eq!(expected, "DataEntityToken");
                assert_eq!(found, "PageElementToken");
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
