mod graphql;
mod health;

pub use graphql::{graphiql, graphql_handler};
pub use health::health_check;
