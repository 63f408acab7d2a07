mod aggregate;
mod event;
mod notification;
mod price;
mod settings;

pub use aggregate::{AggregateSnapshot, BlockRange, BurnRecord};
pub use event::{ChainEvent, EventId, EventKind, TransferEvent};
pub use notification::{ChannelOutcome, ChannelResult, NotificationMessage};
pub use price::PriceSnapshot;
pub use settings::{
	ChainSettings, ChannelConfig, MessageSettings, MonitorSettings, PollingSettings, PriceSettings,
	SecretValue, StartPolicy, TokenSettings,
};
