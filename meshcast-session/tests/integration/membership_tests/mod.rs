mod test_join_room;
