mod test_disconnected_peer_is_removed;
