//! Fixture posts for a fresh database.

use tracing::info;

use crate::{
    config::AppConfig,
    errors::StoreError,
    models::{NewPost, PostFormat},
    store::{MEMORY_URI, PostStore},
};

/// Target used when no document store is configured.
pub const DEFAULT_SEED_URI: &str = "mongodb://localhost:27017/blog";

const FIXTURES: &[(&str, &str, &str)] = &[
    (
        "Getting Started with GraphQL",
        "GraphQL is a powerful query language for APIs that was developed by Facebook. It provides a more efficient, powerful, and flexible alternative to REST. In this post, we'll explore the basics of GraphQL and how it can improve your API development workflow.\n\nKey benefits of GraphQL:\n- Precise data fetching\n- Single endpoint\n- Strong typing\n- Real-time updates\n- Developer tools",
        "John Doe",
    ),
    (
        "Building Modern Web Applications with Next.js",
        "Next.js is a React framework that enables server-side rendering and static site generation. It's perfect for building modern web applications that need to be fast, SEO-friendly, and developer-friendly.\n\nIn this post, we'll cover:\n- Server-side rendering\n- Static site generation\n- API routes\n- File-based routing\n- Built-in CSS support",
        "Jane Smith",
    ),
    (
        "MongoDB Best Practices for Node.js Applications",
        "MongoDB is a popular NoSQL database that works great with Node.js applications. In this post, we'll discuss best practices for using MongoDB in your Node.js projects.\n\nTopics covered:\n- Schema design\n- Indexing strategies\n- Connection pooling\n- Error handling\n- Performance optimization",
        "Mike Johnson",
    ),
    (
        "Understanding TypeScript in Modern Web Development",
        "TypeScript has become an essential tool in modern web development. This post explores how TypeScript enhances JavaScript development with static typing and better tooling.\n\nKey topics:\n- Type system basics\n- Interfaces and types\n- Generics\n- Type inference\n- Integration with React\n- Best practices and patterns",
        "Sarah Wilson",
    ),
    (
        "The Future of Web Development: WebAssembly",
        "WebAssembly (Wasm) is revolutionizing web development by enabling high-performance applications to run in the browser. Let's explore what this means for the future of web development.\n\nWhat we'll cover:\n- What is WebAssembly?\n- Performance benefits\n- Use cases\n- Integration with JavaScript\n- Future possibilities",
        "David Chen",
    ),
    (
        "Building Scalable Microservices with Node.js",
        "Microservices architecture has become a popular approach for building scalable applications. This post dives into how to implement microservices using Node.js.\n\nTopics include:\n- Microservices principles\n- Service communication\n- API Gateway pattern\n- Containerization\n- Deployment strategies\n- Monitoring and logging",
        "Emily Brown",
    ),
    (
        "Mastering CSS Grid and Flexbox",
        "Modern CSS layout techniques have revolutionized web design. This comprehensive guide covers both CSS Grid and Flexbox, showing how to use them together effectively.\n\nWhat you'll learn:\n- Grid layout fundamentals\n- Flexbox basics\n- Combining Grid and Flexbox\n- Responsive design patterns\n- Browser support and fallbacks",
        "Alex Thompson",
    ),
    (
        "The Art of API Design",
        "Designing great APIs is both an art and a science. This post explores the principles and best practices of API design that every developer should know.\n\nKey principles:\n- RESTful design\n- Resource modeling\n- Error handling\n- Versioning strategies\n- Documentation\n- Security considerations",
        "Rachel Martinez",
    ),
];

/// Points the configuration at a persistent store. Seeding the in-process
/// store would discard everything on exit, so it is replaced by the local
/// MongoDB default.
pub fn seed_target(mut config: AppConfig) -> AppConfig {
    if config.mongodb_uri.starts_with(MEMORY_URI) {
        config.mongodb_uri = DEFAULT_SEED_URI.to_string();
    }
    config
}

pub fn sample_posts() -> Vec<NewPost> {
    FIXTURES
        .iter()
        .map(|(title, content, author)| NewPost {
            title: title.to_string(),
            content: content.to_string(),
            author: author.to_string(),
            format: PostFormat::Plain,
        })
        .collect()
}

/// Inserts the fixtures next to whatever is already stored.
pub async fn seed(store: &dyn PostStore) -> Result<usize, StoreError> {
    let inserted = store.insert_many(sample_posts()).await?;
    info!("Inserted sample posts: {}", inserted);
    Ok(inserted)
}
