mod test_misaddressed_offer;
mod test_send_without_channels;
