mod controls;
mod variable_row;
mod window;

use adw::prelude::*;
use adw::Application;
use gtk::gio;

use window::Window;

const APP_ID: &str = "org.varedit.VarEdit";

fn main() {
    pretty_env_logger::init();

    gio::resources_register_include!("varedit.gresource")
        .expect("Failed to register resources.");

    let app = Application::builder().application_id(APP_ID).build();
    app.connect_activate(build_ui);
    app.run();
}

fn build_ui(app: &Application) {
    let window = Window::new(app);
    window.present();
}
