//! [`Catalogs`]-related [`Gateway`] implementations.
//!
//! [`Catalogs`]: crate::domain::catalog::Catalogs

use common::operations::{By, Select};
use serde_json::json;
use tracerr::Traced;

use crate::{
    domain::{Country, DocumentType},
    infra::{
        gateway::{
            self,
            graphql::{
                dto::{CountryDto, DocumentTypeDto},
                Operation,
            },
        },
        Gateway, GraphQl,
    },
};

impl Gateway<Select<By<Vec<Country>, ()>>> for GraphQl {
    type Ok = Vec<Country>;
    type Err = Traced<gateway::Error>;

    #[tracing::instrument(skip_all, fields(gql.name = "countries"))]
    async fn execute(
        &self,
        _: Select<By<Vec<Country>, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        const OP: Operation = Operation {
            name: "Countries",
            field: "countries",
            document: "\
                query Countries { \
                    countries { id CountryCode CountryName } \
                }",
        };
        Ok(self
            .request::<Vec<CountryDto>, _>(&OP, json!({}))
            .await
            .map_err(tracerr::wrap!())?
            .into_iter()
            .map(Into::into)
            .collect())
    }
}

impl Gateway<Select<By<Vec<DocumentType>, ()>>> for GraphQl {
    type Ok = Vec<DocumentType>;
    type Err = Traced<gateway::Error>;

    #[tracing::instrument(skip_all, fields(gql.name = "typeDocuments"))]
    async fn execute(
        &self,
        _: Select<By<Vec<DocumentType>, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        const OP: Operation = Operation {
            name: "TypeDocuments",
            field: "typeDocuments",
            document: "\
                query TypeDocuments { \
                    typeDocuments { id NameTypeDocument } \
                }",
        };
        Ok(self
            .request::<Vec<DocumentTypeDto>, _>(&OP, json!({}))
            .await
            .map_err(tracerr::wrap!())?
            .into_iter()
            .map(Into::into)
            .collect())
    }
}
