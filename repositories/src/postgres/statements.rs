use tokio_postgres::types::Type;

/// SQL text and parameter types of one statement. Statements are prepared
/// per connection through the pool's statement cache.
pub struct Sql {
    pub query: &'static str,
    pub types: &'static [Type],
}

pub const GET: Sql = Sql {
    query: "select id, name, city from people where id = $1",
    types: &[Type::INT8],
};

// strpos keeps filter text literal, `%` and `_` are not wildcards
pub const LIST: Sql = Sql {
    query: "select id, name, city from people \
            where ($1::varchar is null or strpos(lower(name), lower($1)) > 0) \
            and ($2::varchar is null or strpos(lower(city), lower($2)) > 0) \
            order by id offset $3 limit $4",
    types: &[Type::VARCHAR, Type::VARCHAR, Type::INT8, Type::INT8],
};

pub const COUNT: Sql = Sql {
    query: "select count(*) as total from people \
            where ($1::varchar is null or strpos(lower(name), lower($1)) > 0) \
            and ($2::varchar is null or strpos(lower(city), lower($2)) > 0)",
    types: &[Type::VARCHAR, Type::VARCHAR],
};

pub const ALL: Sql = Sql {
    query: "select id, name, city from people order by id",
    types: &[],
};

pub const INSERT: Sql = Sql {
    query: "insert into people (name, city) values ($1, $2) returning id, name, city",
    types: &[Type::VARCHAR, Type::VARCHAR],
};

pub const UPSERT: Sql = Sql {
    query: "insert into people (id, name, city) values ($1, $2, $3) \
            on conflict (id) do update set name = excluded.name, city = excluded.city \
            returning id, name, city",
    types: &[Type::INT8, Type::VARCHAR, Type::VARCHAR],
};

// one explicit-id save at a time moves the sequence
pub const LOCK_ID_SEQUENCE: Sql = Sql {
    query: "select pg_advisory_xact_lock(hashtext('people_id_seq'))",
    types: &[],
};

// moves the identity sequence forward to $1 so generated ids stay above it,
// never backwards. The sequence name is the one the migration creates.
pub const SYNC_ID_SEQUENCE: Sql = Sql {
    query: "select setval('people_id_seq', $1) from people_id_seq where $1 >= last_value",
    types: &[Type::INT8],
};

pub const REPLACE: Sql = Sql {
    query: "update people set name = $2, city = $3 where id = $1 returning id, name, city",
    types: &[Type::INT8, Type::VARCHAR, Type::VARCHAR],
};

pub const EXISTS: Sql = Sql {
    query: "select exists(select 1 from people where id = $1) as found",
    types: &[Type::INT8],
};

pub const PATCH: Sql = Sql {
    query: "update people set \
            name = case when $2 then $3 else name end, \
            city = case when $4 then $5 else city end \
            where id = $1 returning id, name, city",
    types: &[Type::INT8, Type::BOOL, Type::VARCHAR, Type::BOOL, Type::VARCHAR],
};

pub const DELETE: Sql = Sql {
    query: "delete from people where id = $1",
    types: &[Type::INT8],
};
