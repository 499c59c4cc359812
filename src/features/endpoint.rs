use crate::network::Endpoint;

/// Movie API operations
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MovieEndpoint {
    Search {
        query: String,
        page: u32,
        language: String,
    },
    Details {
        id: i64,
        language: String,
    },
}

impl Endpoint for MovieEndpoint {
    fn path(&self) -> String {
        match self {
            MovieEndpoint::Search { .. } => "/search/movie".to_string(),
            MovieEndpoint::Details { id, .. } => format!("/movie/{}", id),
        }
    }

    fn query(&self) -> Vec<(String, String)> {
        match self {
            MovieEndpoint::Search {
                query,
                page,
                language,
            } => vec![
                ("query".to_string(), query.clone()),
                ("page".to_string(), page.to_string()),
                ("include_adult".to_string(), "false".to_string()),
                ("language".to_string(), language.clone()),
            ],
            MovieEndpoint::Details { language, .. } => {
                vec![("language".to_string(), language.clone())]
            }
        }
    }
}
