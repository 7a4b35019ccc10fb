use lapin::options::{
    BasicConsumeOptions, BasicQosOptions, ExchangeDeclareOptions, QueueBindOptions,
    QueueDeclareOptions,
};
use lapin::types::FieldTable;
use lapin::{Channel, Connection, ConnectionProperties, Consumer, ExchangeKind};

/// A durable queue bound to a set of topics on the client's exchange.
#[derive(Debug, Clone, Copy)]
pub struct QueueBinding<'a> {
    pub queue: &'a str,
    pub topics: &'a [&'a str],
    /// Unacked deliveries the broker may push ahead. One keeps handling in
    /// delivery order.
    pub prefetch: u16,
}

impl<'a> QueueBinding<'a> {
    pub fn sequential(queue: &'a str, topics: &'a [&'a str]) -> Self {
        Self { queue, topics, prefetch: 1 }
    }

    fn consumer_tag(&self) -> String {
        format!("{}-consumer", self.queue)
    }
}

/// Consumer side of the platform's topic exchange.
#[derive(Clone)]
pub struct RabbitMQClient {
    channel: Channel,
    exchange: String,
}

impl RabbitMQClient {
    /// Open a channel and declare the durable topic `exchange`.
    pub async fn connect(url: &str, exchange: &str) -> Result<Self, lapin::Error> {
        let conn = Connection::connect(url, ConnectionProperties::default()).await?;
        let channel = conn.create_channel().await?;

        channel
            .exchange_declare(
                exchange,
                ExchangeKind::Topic,
                ExchangeDeclareOptions {
                    durable: true,
                    ..Default::default()
                },
                FieldTable::default(),
            )
            .await?;

        tracing::info!(exchange = %exchange, "connected to RabbitMQ");
        Ok(Self {
            channel,
            exchange: exchange.to_string(),
        })
    }

    /// Declare and bind the queue, then start consuming from it.
    pub async fn subscribe(&self, binding: QueueBinding<'_>) -> Result<Consumer, lapin::Error> {
        self.channel
            .queue_declare(
                binding.queue,
                QueueDeclareOptions {
                    durable: true,
                    ..Default::default()
                },
                FieldTable::default(),
            )
            .await?;

        for topic in binding.topics {
            self.channel
                .queue_bind(
                    binding.queue,
                    &self.exchange,
                    topic,
                    QueueBindOptions::default(),
                    FieldTable::default(),
                )
                .await?;
        }

        self.channel
            .basic_qos(binding.prefetch, BasicQosOptions::default())
            .await?;

        let consumer = self
            .channel
            .basic_consume(
                binding.queue,
                &binding.consumer_tag(),
                BasicConsumeOptions::default(),
                FieldTable::default(),
            )
            .await?;

        tracing::info!(
            queue = %binding.queue,
            exchange = %self.exchange,
            prefetch = binding.prefetch,
            bindings = ?binding.topics,
            "subscribed to RabbitMQ queue"
        );

        Ok(consumer)
    }
}
