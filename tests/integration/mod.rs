mod helpers;
mod test_cli;
mod test_configure;
mod test_organize;
