use sqlx::PgPool;

#[derive(Clone)]
pub struct SqlxUserRepo {
    pub pool: PgPool,
}

#[derive(Clone)]
pub struct SqlxMediaRepo {
    pub pool: PgPool,
}

#[derive(Clone)]
pub struct SqlxCommentRepo {
    pub pool: PgPool,
}
