mod test_close_returns_to_idle;
mod test_reconnects_when_relay_appears;
mod test_unreachable_relay_disconnects;
