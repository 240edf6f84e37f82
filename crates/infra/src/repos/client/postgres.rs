use super::IClientRepo;
use salon_scheduler_domain::{ChannelIdentity, Client, ClientIdentity, ID};
use sqlx::{types::Uuid, FromRow, PgPool};
use tracing::error;

pub struct PostgresClientRepo {
    pool: PgPool,
}

impl PostgresClientRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct ClientRaw {
    client_uid: Uuid,
    tenant_uid: Uuid,
    name: Option<String>,
    phone: Option<String>,
    channel: Option<String>,
    channel_user_id: Option<String>,
}

impl From<ClientRaw> for Client {
    fn from(e: ClientRaw) -> Self {
        let channel = match (e.channel, e.channel_user_id) {
            (Some(channel), Some(user_id)) => Some(ChannelIdentity { channel, user_id }),
            _ => None,
        };
        Self {
            id: e.client_uid.into(),
            tenant_id: e.tenant_uid.into(),
            name: e.name,
            phone: e.phone,
            channel,
        }
    }
}

#[async_trait::async_trait]
impl IClientRepo for PostgresClientRepo {
    async fn insert(&self, client: &Client) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO clients(client_uid, tenant_uid, name, phone, channel, channel_user_id)
            VALUES($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(client.id.inner_ref())
        .bind(client.tenant_id.inner_ref())
        .bind(&client.name)
        .bind(&client.phone)
        .bind(client.channel.as_ref().map(|c| c.channel.clone()))
        .bind(client.channel.as_ref().map(|c| c.user_id.clone()))
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!("Unable to insert client: {:?}. DB returned error: {:?}", client, e);
            e
        })?;
        Ok(())
    }

    async fn find(&self, client_id: &ID) -> anyhow::Result<Option<Client>> {
        let res: Option<ClientRaw> = sqlx::query_as(
            r#"
            SELECT * FROM clients AS c
            WHERE c.client_uid = $1
            "#,
        )
        .bind(client_id.inner_ref())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Find client with id: {:?} failed. DB returned error: {:?}",
                client_id, e
            );
            e
        })?;

        Ok(res.map(|client| client.into()))
    }

    async fn find_by_identity(
        &self,
        tenant_id: &ID,
        identity: &ClientIdentity,
    ) -> anyhow::Result<Option<Client>> {
        let phone = identity.phone.as_ref().map(|p| p.trim().to_string());
        let (channel, channel_user_id) = match &identity.channel {
            Some(c) => (Some(c.channel.clone()), Some(c.user_id.clone())),
            None => (None, None),
        };
        let res: Option<ClientRaw> = sqlx::query_as(
            r#"
            SELECT * FROM clients AS c
            WHERE c.tenant_uid = $1 AND (
                c.phone = $2 OR
                (c.channel = $3 AND c.channel_user_id = $4)
            )
            LIMIT 1
            "#,
        )
        .bind(tenant_id.inner_ref())
        .bind(phone)
        .bind(channel)
        .bind(channel_user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(res.map(|client| client.into()))
    }
}
